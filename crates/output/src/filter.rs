//! `key=value` resource filters.
//!
//! Known keys address record fields; any other key addresses a tag. A value
//! ending in `*` matches as a case-insensitive substring, anything else as a
//! case-insensitive equality. A record passes only if every filter matches.

use std::fmt;
use std::str::FromStr;

use awsinv_core::ResourceRecord;

use crate::error::{OutputError, OutputResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    key: String,
    value: String,
    substring: bool,
}

impl Filter {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn matches(&self, record: &ResourceRecord) -> bool {
        let field = match self.key.as_str() {
            "service" => Some(record.service.as_str()),
            "region" => Some(record.region.as_str()),
            "id" => Some(record.id.as_str()),
            "name" => record.name.as_deref(),
            "type" => record.kind.as_deref(),
            "state" => record.state.as_deref(),
            "class" => record.class.as_deref(),
            tag => match record.tags.get(tag) {
                Some(v) => Some(v.as_str()),
                None => return false,
            },
        };
        let field = field.unwrap_or_default();

        if self.substring {
            field.to_lowercase().contains(&self.value.to_lowercase())
        } else {
            field.to_lowercase() == self.value.to_lowercase()
        }
    }
}

impl FromStr for Filter {
    type Err = OutputError;

    fn from_str(raw: &str) -> OutputResult<Self> {
        let (key, value) = raw
            .split_once('=')
            .ok_or_else(|| OutputError::InvalidFilter(raw.to_string()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(OutputError::InvalidFilter(raw.to_string()));
        }

        let value = value.trim();
        let (value, substring) = match value.strip_suffix('*') {
            Some(prefix) => (prefix, true),
            None => (value, false),
        };

        Ok(Self {
            key: key.to_string(),
            value: value.to_string(),
            substring,
        })
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}{}", self.key, self.value, if self.substring { "*" } else { "" })
    }
}

pub fn parse_filters<S: AsRef<str>>(raw: &[S]) -> OutputResult<Vec<Filter>> {
    raw.iter().map(|s| s.as_ref().parse()).collect()
}

/// Records passing every filter, in their original order.
pub fn apply_filters<'a>(records: &'a [ResourceRecord], filters: &[Filter]) -> Vec<&'a ResourceRecord> {
    records
        .iter()
        .filter(|r| filters.iter().all(|f| f.matches(r)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn web() -> ResourceRecord {
        ResourceRecord::new("ec2", "us-east-1", "i-1")
            .with_name("Web-Frontend")
            .with_state("running")
            .with_tag("env", "Prod")
    }

    fn filter(raw: &str) -> Filter {
        raw.parse().unwrap()
    }

    #[test]
    fn equality_ignores_case() {
        assert!(filter("state=RUNNING").matches(&web()));
        assert!(!filter("state=run").matches(&web()));
    }

    #[test]
    fn trailing_star_is_substring() {
        assert!(filter("name=front*").matches(&web()));
        assert!(!filter("name=back*").matches(&web()));
    }

    #[test]
    fn unknown_key_addresses_tags() {
        assert!(filter("env=prod").matches(&web()));
        assert!(!filter("team=core").matches(&web()));
    }

    #[test]
    fn missing_optional_field_matches_only_empty() {
        let bare = ResourceRecord::new("s3", "global", "b");
        assert!(filter("class=").matches(&bare));
        assert!(!filter("class=db.t3.micro").matches(&bare));
    }

    #[test]
    fn malformed_filters_are_rejected() {
        assert!(matches!("state".parse::<Filter>(), Err(OutputError::InvalidFilter(_))));
        assert!(matches!("=x".parse::<Filter>(), Err(OutputError::InvalidFilter(_))));
    }

    #[test]
    fn value_may_contain_equals() {
        let f = filter("policy=a=b");
        assert_eq!(f.key(), "policy");
        assert_eq!(f.to_string(), "policy=a=b");
    }

    #[test]
    fn all_filters_must_match() {
        let records = vec![web(), ResourceRecord::new("ec2", "us-east-1", "i-2").with_state("stopped")];
        let filters = parse_filters(&["service=ec2", "state=running"]).unwrap();
        let kept = apply_filters(&records, &filters);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "i-1");
    }
}
