mod search_client;
