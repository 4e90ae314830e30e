// tests/semantic/classifier_test.rs

#[cfg(test)]
mod tests {
    use scaffold::semantic::classifier::{
        classify, is_coordinate, is_latitude, is_longitude, role_from_name, role_from_type,
    };
    use scaffold::semantic::SemanticRole;

    fn role(name: &str, data_type: &str) -> SemanticRole {
        classify(name, data_type, None, &[])
    }

    #[test]
    fn test_name_patterns() {
        let cases = [
            ("license_id", "bigint", SemanticRole::Identifier),
            ("license_number", "varchar", SemanticRole::Identifier),
            ("translation_key", "varchar", SemanticRole::Identifier),
            ("bl_status", "varchar", SemanticRole::BusinessStatus),
            ("is_active", "boolean", SemanticRole::BusinessStatus),
            ("created_at", "timestamp", SemanticRole::Temporal),
            ("issue_date", "varchar", SemanticRole::Temporal),
            ("emirate_city", "varchar", SemanticRole::Geographic),
            ("latitude", "double", SemanticRole::Geographic),
            ("annual_fee", "decimal(12,2)", SemanticRole::Monetary),
            ("trade_name", "varchar", SemanticRole::Descriptive),
            ("employee_count", "integer", SemanticRole::Metric),
        ];
        for (name, data_type, expected) in cases {
            assert_eq!(role(name, data_type), expected, "column {}", name);
        }
    }

    #[test]
    fn test_identifier_patterns_win_over_status() {
        // `status_id` carries both an identifier and a status word.
        assert_eq!(role("status_id", "integer"), SemanticRole::Identifier);
        assert_eq!(role("License_ID", "integer"), SemanticRole::Identifier);
    }

    #[test]
    fn test_type_fallback() {
        assert_eq!(role("license_type", "varchar"), SemanticRole::Categorical);
        assert_eq!(role("verified", "boolean"), SemanticRole::BusinessStatus);
        assert_eq!(role("valid_from", "timestamp"), SemanticRole::Temporal);
        assert_eq!(role("paid", "numeric(10,2)"), SemanticRole::Monetary);
        assert_eq!(role("score", "double"), SemanticRole::Unknown);
        assert_eq!(role("payload", "geometry"), SemanticRole::Unknown);
    }

    #[test]
    fn test_unparsed_type_names() {
        assert_eq!(role_from_type("datetime2"), Some(SemanticRole::Temporal));
        assert_eq!(role_from_type("smallmoney"), Some(SemanticRole::Monetary));
        assert_eq!(role_from_type("boolean_flag"), Some(SemanticRole::BusinessStatus));
        assert_eq!(role_from_type("geometry"), None);
    }

    #[test]
    fn test_hint_wins() {
        assert_eq!(
            classify("license_id", "bigint", Some("categorical"), &[]),
            SemanticRole::Categorical
        );
        assert_eq!(
            classify("valid_from", "varchar", Some("Temporal"), &[]),
            SemanticRole::Temporal
        );
    }

    #[test]
    fn test_unrecognized_hint_is_ignored() {
        assert_eq!(
            classify("license_id", "bigint", Some("measure"), &[]),
            SemanticRole::Identifier
        );
    }

    #[test]
    fn test_accepted_values_make_categorical() {
        let values = vec!["DXB".to_string(), "AUH".to_string()];
        assert_eq!(
            classify("region_code", "varchar", None, &values),
            SemanticRole::Categorical
        );
    }

    #[test]
    fn test_unknown_when_nothing_matches() {
        assert_eq!(role("payload", ""), SemanticRole::Unknown);
        assert_eq!(role_from_name("payload"), None);
    }

    #[test]
    fn test_coordinate_names() {
        assert!(is_latitude("lat"));
        assert!(is_latitude("lat_dd"));
        assert!(is_latitude("site_latitude"));
        assert!(!is_latitude("latest_date"));
        assert!(!is_latitude("platform"));

        assert!(is_longitude("lon_dd"));
        assert!(is_longitude("lng"));
        assert!(is_longitude("site_longitude"));
        assert!(!is_longitude("london_branch"));

        assert!(is_coordinate("lat_dd"));
        assert!(!is_coordinate("emirate_city"));
    }
}
