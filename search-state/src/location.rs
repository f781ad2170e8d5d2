use std::fmt;
use tokio::sync::mpsc;

/// Path plus query string of one history entry, without the leading `?`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: String,
}

impl Location {
    pub fn new(path: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: query.into(),
        }
    }

    /// Splits `/path?query#fragment`; the fragment is dropped.
    pub fn parse(url: &str) -> Self {
        let url = url.split_once('#').map_or(url, |(before, _)| before);
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        let path = if path.is_empty() { "/" } else { path };
        Self::new(path, query)
    }

    pub fn to_url(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Receives every location the navigator moves to after `listen` was called.
#[derive(Debug)]
pub struct Listener {
    pub id: ListenerId,
    pub rx: mpsc::UnboundedReceiver<Location>,
}

/// The part of a browser history the search view relies on.
pub trait Navigator {
    fn push(&mut self, location: Location);

    fn current(&self) -> &Location;

    fn listen(&mut self) -> Listener;

    /// Returns false if `id` was not registered.
    fn unlisten(&mut self, id: ListenerId) -> bool;
}

/// In-memory history stack with back/forward, used by the CLI and tests.
#[derive(Debug)]
pub struct MemoryHistory {
    entries: Vec<Location>,
    index: usize,
    listeners: Vec<(ListenerId, mpsc::UnboundedSender<Location>)>,
    next_listener: u64,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new(Location::new("/", ""))
    }
}

impl MemoryHistory {
    pub fn new(initial: Location) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        self.notify();
        true
    }

    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        self.notify();
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn notify(&mut self) {
        let location = self.entries[self.index].clone();
        self.listeners
            .retain(|(_, tx)| tx.send(location.clone()).is_ok());
    }
}

impl Navigator for MemoryHistory {
    fn push(&mut self, location: Location) {
        self.entries.truncate(self.index + 1);
        self.entries.push(location);
        self.index = self.entries.len() - 1;
        self.notify();
    }

    fn current(&self) -> &Location {
        &self.entries[self.index]
    }

    fn listen(&mut self) -> Listener {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        let (tx, rx) = mpsc::unbounded_channel();
        self.listeners.push((id, tx));
        Listener { id, rx }
    }

    fn unlisten(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener, _)| *listener != id);
        self.listeners.len() != before
    }
}
