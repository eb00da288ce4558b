//! Local patient list filtering.

use crate::domain::entities::Patient;

/// Matches a query against the full name (case-insensitive) or the RUT (substring).
#[must_use]
pub fn matches(patient: &Patient, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    patient
        .full_name()
        .to_lowercase()
        .contains(&query.to_lowercase())
        || patient.rut().contains(query)
}

/// Returns the patients matching `query`, keeping their order.
#[must_use]
pub fn filter<'a>(patients: &'a [Patient], query: &str) -> Vec<&'a Patient> {
    patients.iter().filter(|p| matches(p, query)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn patients() -> Vec<Patient> {
        let born = NaiveDate::from_ymd_opt(1950, 3, 14).unwrap();
        vec![
            Patient::new(1_u64, "Juan Pablo", "Soto", "12.345.678-5", born),
            Patient::new(2_u64, "María", "González", "9.876.543-3", born),
        ]
    }

    #[test]
    fn test_empty_query_keeps_all() {
        assert_eq!(filter(&patients(), "  ").len(), 2);
    }

    #[test]
    fn test_name_match_is_case_insensitive() {
        let list = patients();
        let found = filter(&list, "pablo soto");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].first_name(), "Juan Pablo");
        assert_eq!(filter(&list, "MARÍA").len(), 1);
    }

    #[test]
    fn test_rut_substring() {
        let list = patients();
        let found = filter(&list, "876.5");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].last_name(), "González");
    }
}
