// tests/semantic/naming_test.rs

#[cfg(test)]
mod tests {
    use scaffold::config::NamingSettings;
    use scaffold::semantic::{to_parameter_name, NamingTransform, ParameterNames};

    #[test]
    fn test_default_transform() {
        let cases = [
            ("bl_status_en", "BlStatusEn"),
            ("license_owner_id", "LicenseOwner"),
            ("dim_customer_key", "Customer"),
            ("trade_name", "TradeName"),
            ("issue_date", "IssueDate"),
            ("owner_name_ar", "OwnerNameAr"),
            ("co_owner_id", "CoOwner"),
            ("lat_dd", "LatDd"),
        ];
        for (column, expected) in cases {
            assert_eq!(to_parameter_name(column), expected, "column {}", column);
        }
    }

    #[test]
    fn test_transform_is_deterministic() {
        assert_eq!(
            to_parameter_name("license_owner_id"),
            to_parameter_name("LICENSE_OWNER_ID")
        );
    }

    #[test]
    fn test_configured_suffixes() {
        let settings = NamingSettings {
            identifier_suffixes: vec!["_ref".into()],
            language_suffixes: vec![],
            ..Default::default()
        };
        let transform = NamingTransform::new(&settings);
        assert_eq!(transform.parameter_name("owner_ref"), "Owner");
        assert_eq!(transform.parameter_name("owner_id"), "OwnerId");
        assert_eq!(transform.parameter_name("city_name_en"), "CityNameEn");
    }

    #[test]
    fn test_parameter_names_reversible() {
        let transform = NamingTransform::new(&NamingSettings::default());
        let names = ParameterNames::build(
            &transform,
            ["license_id", "bl_status_en", "issue_date"],
        );

        assert_eq!(names.len(), 3);
        assert_eq!(names.parameter("bl_status_en"), Some("BlStatusEn"));
        assert_eq!(names.column("BlStatusEn"), Some("bl_status_en"));
        assert_eq!(names.column("License"), Some("license_id"));
        assert!(names.collisions().is_empty());
    }

    #[test]
    fn test_collision_keeps_first_column() {
        let transform = NamingTransform::new(&NamingSettings::default());
        let names = ParameterNames::build(&transform, ["owner_id", "owner_key", "owner_name"]);

        assert_eq!(names.parameter("owner_id"), Some("Owner"));
        assert_eq!(names.parameter("owner_key"), None);
        assert_eq!(names.column("Owner"), Some("owner_id"));
        assert_eq!(names.len(), 2);

        let collisions = names.collisions();
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].parameter, "Owner");
        assert_eq!(collisions[0].kept, "owner_id");
        assert_eq!(collisions[0].dropped, "owner_key");
    }

    #[test]
    fn test_empty_names() {
        let transform = NamingTransform::new(&NamingSettings::default());
        let names = ParameterNames::build(&transform, std::iter::empty());
        assert!(names.is_empty());
    }
}
