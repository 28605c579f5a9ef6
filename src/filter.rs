use crate::models::Record;

/// Sentinel selector value imposing no constraint.
pub const ALL: &str = "All";

/// The two sidebar selectors. `None` means the sentinel "All" is selected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    pub region: Option<String>,
    pub persona: Option<String>,
}

impl Filters {
    pub fn from_selection(region: &str, persona: &str) -> Self {
        Self {
            region: (region != ALL).then(|| region.to_string()),
            persona: (persona != ALL).then(|| persona.to_string()),
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.region
            .as_deref()
            .map_or(true, |region| record.region == region)
            && self
                .persona
                .as_deref()
                .map_or(true, |persona| record.persona == persona)
    }
}

/// Narrows the collection to records matching both selectors, preserving the
/// source row order. Pure and idempotent; the input is never mutated.
pub fn apply(records: &[Record], filters: &Filters) -> Vec<Record> {
    records
        .iter()
        .filter(|record| filters.matches(record))
        .cloned()
        .collect()
}

/// Distinct values of one categorical field, sorted ascending, behind the
/// "All" sentinel. Drives the selector dropdowns.
pub fn selector_domain<F>(records: &[Record], field: F) -> Vec<String>
where
    F: Fn(&Record) -> &str,
{
    let mut values: Vec<String> = records
        .iter()
        .map(|record| field(record).to_string())
        .collect();
    values.sort();
    values.dedup();
    values.insert(0, ALL.to_string());
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_record;

    fn record(region: &str, persona: &str) -> Record {
        let mut record = sample_record();
        record.region = region.to_string();
        record.persona = persona.to_string();
        record
    }

    fn collection() -> Vec<Record> {
        vec![
            record("North", "Seeker"),
            record("North", "Volunteer"),
            record("South", "Seeker"),
        ]
    }

    #[test]
    fn all_selectors_return_the_collection_unchanged() {
        let records = collection();
        let filtered = apply(&records, &Filters::from_selection(ALL, ALL));
        assert_eq!(filtered, records);
    }

    #[test]
    fn selectors_apply_with_and_semantics() {
        let records = collection();
        let filters = Filters::from_selection("North", "Seeker");
        let filtered = apply(&records, &filters);

        assert_eq!(filtered.len(), 1);
        assert!(filtered
            .iter()
            .all(|r| r.region == "North" && r.persona == "Seeker"));
        assert!(filtered.iter().all(|r| records.contains(r)));
    }

    #[test]
    fn single_selector_leaves_the_other_field_unconstrained() {
        let records = collection();
        let filtered = apply(&records, &Filters::from_selection("North", ALL));

        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|r| r.region == "North"));
    }

    #[test]
    fn filtering_is_idempotent() {
        let records = collection();
        let filters = Filters::from_selection("South", ALL);
        let once = apply(&records, &filters);
        let twice = apply(&once, &filters);
        assert_eq!(once, twice);
    }

    #[test]
    fn unmatched_selector_yields_empty_subset() {
        let records = collection();
        let filtered = apply(&records, &Filters::from_selection("East", ALL));
        assert!(filtered.is_empty());
    }

    #[test]
    fn selector_domain_is_sorted_behind_the_sentinel() {
        let records = vec![
            record("South", "Seeker"),
            record("North", "Seeker"),
            record("North", "Volunteer"),
        ];
        let domain = selector_domain(&records, |r| &r.region);
        assert_eq!(domain, vec!["All", "North", "South"]);
    }
}
