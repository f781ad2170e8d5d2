use gitss_protocol::BaseFilterOptions;
use gitss_protocol::Hit;
use gitss_protocol::Indexed;
use gitss_protocol::NO_EXTENSION_TERM;
use gitss_protocol::SelectOption;
use gitss_search_state::AppState;

pub(crate) fn search_report(state: &AppState) -> String {
    let result = &state.result;
    let mut out = String::new();
    out.push_str(&format!(
        "{} hits in {:.3}s (page {} of {})\n",
        result.size,
        result.time.max(0.0),
        u64::from(result.current) + 1,
        result.page_count().max(1)
    ));
    for hit in &result.hits {
        out.push('\n');
        render_hit(&mut out, hit);
    }
    if !state.facets.facets.is_empty() {
        out.push('\n');
        for (name, facet) in &state.facets.facets {
            let terms: Vec<String> = facet
                .terms
                .iter()
                .map(|term| format!("{} ({})", display_term(&term.term), term.count))
                .collect();
            out.push_str(&format!("{name}: {}\n", terms.join(", ")));
        }
    }
    out
}

fn render_hit(out: &mut String, hit: &Hit) {
    let refs: Vec<&str> = hit
        .branches
        .iter()
        .chain(hit.tags.iter())
        .map(String::as_str)
        .collect();
    out.push_str(&format!(
        "{}/{}/{}:{} [{}]\n",
        hit.organization,
        hit.project,
        hit.repository,
        hit.path,
        refs.join(", ")
    ));
    for preview in &hit.preview {
        let lines: Vec<&str> = preview.preview.lines().collect();
        for (index, line_number) in preview.hits.iter().zip(preview.matched_lines()) {
            let Some(line) = lines.get(*index as usize) else {
                continue;
            };
            out.push_str(&format!(
                "{:>6}: {}\n",
                line_number.saturating_add(1),
                line.trim_end()
            ));
        }
    }
}

fn display_term(term: &str) -> &str {
    if term == NO_EXTENSION_TERM {
        "(no extension)"
    } else {
        term
    }
}

pub(crate) fn filters_report(options: &BaseFilterOptions) -> String {
    let groups: [(&str, &[SelectOption]); 5] = [
        ("organizations", &options.organizations),
        ("projects", &options.projects),
        ("repositories", &options.repositories),
        ("branches", &options.branches),
        ("tags", &options.tags),
    ];
    let mut out = String::new();
    for (label, values) in groups {
        if values.is_empty() {
            continue;
        }
        let values: Vec<&str> = values.iter().map(|option| option.label.as_str()).collect();
        out.push_str(&format!("{label}: {}\n", values.join(", ")));
    }
    out
}

pub(crate) fn indexed_report(list: &[Indexed]) -> String {
    let mut out = String::new();
    for indexed in list {
        out.push_str(&format!(
            "{}/{}/{} (updated {})\n",
            indexed.organization, indexed.project, indexed.repository, indexed.last_updated
        ));
        let refs = indexed
            .branches
            .iter()
            .map(|(name, commit)| ("branch", name, commit))
            .chain(indexed.tags.iter().map(|(name, commit)| ("tag", name, commit)));
        for (kind, name, commit) in refs {
            out.push_str(&format!("  {kind} {name} @ {commit}\n"));
        }
    }
    out
}
