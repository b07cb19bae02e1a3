use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use awsinv_core::ResourceRecord;

use crate::error::OutputError;

/// Field to order resources by. Ties are broken by `id`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Service,
    Region,
    Id,
    Name,
    Type,
    State,
}

impl SortKey {
    fn field(self, record: &ResourceRecord) -> &str {
        match self {
            SortKey::Service => &record.service,
            SortKey::Region => &record.region,
            SortKey::Id => &record.id,
            SortKey::Name => record.name.as_deref().unwrap_or_default(),
            SortKey::Type => record.kind.as_deref().unwrap_or_default(),
            SortKey::State => record.state.as_deref().unwrap_or_default(),
        }
    }

    pub fn compare(self, a: &ResourceRecord, b: &ResourceRecord) -> Ordering {
        self.field(a).cmp(self.field(b)).then_with(|| a.id.cmp(&b.id))
    }
}

impl FromStr for SortKey {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "service" => Ok(SortKey::Service),
            "region" => Ok(SortKey::Region),
            "id" => Ok(SortKey::Id),
            "name" => Ok(SortKey::Name),
            "type" => Ok(SortKey::Type),
            "state" => Ok(SortKey::State),
            _ => Err(OutputError::UnknownSortKey(s.to_string())),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortKey::Service => "service",
            SortKey::Region => "region",
            SortKey::Id => "id",
            SortKey::Name => "name",
            SortKey::Type => "type",
            SortKey::State => "state",
        })
    }
}

/// Stable sort by `key`, then `id`.
pub fn sort_resources(records: &mut [&ResourceRecord], key: SortKey) {
    records.sort_by(|a, b| key.compare(a, b));
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ties_fall_back_to_id() {
        let a = ResourceRecord::new("ec2", "r", "i-2");
        let b = ResourceRecord::new("ec2", "r", "i-1");
        let c = ResourceRecord::new("ab", "r", "i-9");
        let mut refs = vec![&a, &b, &c];
        sort_resources(&mut refs, SortKey::Service);
        let ids: Vec<_> = refs.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["i-9", "i-1", "i-2"]);
    }

    #[test]
    fn missing_names_sort_first() {
        let named = ResourceRecord::new("ec2", "r", "i-1").with_name("alpha");
        let anonymous = ResourceRecord::new("ec2", "r", "i-2");
        assert_eq!(SortKey::Name.compare(&anonymous, &named), Ordering::Less);
    }

    #[test]
    fn keys_parse_case_insensitively() {
        assert_eq!("Region".parse::<SortKey>().unwrap(), SortKey::Region);
        assert!("cost".parse::<SortKey>().is_err());
        assert_eq!(SortKey::default().to_string(), "service");
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: sorting yields a sequence ordered by (key, id).
        #[test]
        fn sorted_output_is_ordered(
            rows in prop::collection::vec(("[a-c]", "r[0-2]", "[0-9]{1,2}"), 0..20)
        ) {
            let records: Vec<_> = rows
                .iter()
                .map(|(s, r, id)| ResourceRecord::new(s.as_str(), r.as_str(), id.as_str()))
                .collect();
            let mut refs: Vec<_> = records.iter().collect();
            sort_resources(&mut refs, SortKey::Region);

            for pair in refs.windows(2) {
                prop_assert_ne!(SortKey::Region.compare(pair[0], pair[1]), Ordering::Greater);
            }
        }
    }
}
