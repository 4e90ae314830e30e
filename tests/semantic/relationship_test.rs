// tests/semantic/relationship_test.rs

#[path = "../common/mod.rs"]
mod common;

#[cfg(test)]
mod tests {
    use super::common::{entity, licensing_entities};
    use scaffold::config::Settings;
    use scaffold::model::{ColumnModel, ColumnTest, ModelGraph, TableModel};
    use scaffold::semantic::relationships::match_target;
    use scaffold::semantic::{
        assemble, resolve_relationships, Cardinality, Entity, JoinKey, RelationshipSource,
    };

    fn keyed(name: &str, key: &str) -> TableModel {
        TableModel::new(name).with_column(ColumnModel::new(key, "bigint").primary_key())
    }

    fn resolve(graph: ModelGraph) -> Vec<Entity> {
        resolve_relationships(assemble(&graph, &Settings::default()).unwrap())
    }

    #[test]
    fn test_explicit_and_name_matched_links() {
        let entities = licensing_entities(&Settings::default());
        let licenses = entity(&entities, "licenses");

        let keys: Vec<&str> = licenses.relationships.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["licenses_to_owners", "licenses_to_owners_via_co_owner_id"]
        );

        let explicit = &licenses.relationships["licenses_to_owners"];
        assert_eq!(explicit.from_entity, "licenses");
        assert_eq!(explicit.to_entity, "owners");
        assert_eq!(explicit.cardinality, Cardinality::ManyToOne);
        assert_eq!(explicit.source, RelationshipSource::Explicit);
        assert_eq!(
            explicit.join_keys,
            vec![JoinKey {
                from: "owner_id".into(),
                to: "owner_id".into()
            }]
        );

        let matched = &licenses.relationships["licenses_to_owners_via_co_owner_id"];
        assert_eq!(matched.source, RelationshipSource::NameMatch);
        assert_eq!(matched.from_column(), "co_owner_id");
        assert_eq!(matched.join_keys[0].to, "owner_id");

        assert!(entity(&entities, "owners").relationships.is_empty());
    }

    #[test]
    fn test_declared_field_beats_target_primary_key() {
        let entities = resolve(
            ModelGraph::new()
                .with_table(keyed("dim_owners", "owner_id"))
                .with_table(
                    keyed("dim_license_owners", "license_owner_id")
                        .with_column(ColumnModel::new("owner_pk", "bigint")),
                )
                .with_table(
                    keyed("dim_licenses", "license_pk").with_column(
                        ColumnModel::new("license_owner_id", "bigint")
                            .references("license_owners", "owner_pk"),
                    ),
                ),
        );
        assert_eq!(
            entity(&entities, "license_owners").primary_key,
            "license_owner_id"
        );

        let licenses = entity(&entities, "licenses");
        assert_eq!(licenses.relationships.len(), 1);
        let rel = &licenses.relationships["licenses_to_license_owners"];
        assert_eq!(rel.source, RelationshipSource::Explicit);
        assert_eq!(
            rel.join_keys,
            vec![JoinKey {
                from: "license_owner_id".into(),
                to: "owner_pk".into()
            }]
        );
    }

    #[test]
    fn test_longest_name_match_wins() {
        let entities = resolve(
            ModelGraph::new()
                .with_table(keyed("dim_owners", "owner_id"))
                .with_table(keyed("dim_license_owners", "license_owner_key"))
                .with_table(
                    keyed("dim_licenses", "license_id")
                        .with_column(ColumnModel::new("license_owner_id", "bigint")),
                ),
        );
        let licenses = entity(&entities, "licenses");
        let rel = &licenses.relationships["licenses_to_license_owners"];
        assert_eq!(rel.join_keys[0].from, "license_owner_id");
        assert_eq!(rel.join_keys[0].to, "license_owner_key");
        assert_eq!(licenses.relationships.len(), 1);
    }

    #[test]
    fn test_tied_name_match_dropped() {
        let entities = resolve(
            ModelGraph::new()
                .with_table(keyed("dim_owners", "owner_id"))
                .with_table(keyed("dim_agents", "agent_id"))
                .with_table(
                    keyed("dim_licenses", "license_id")
                        .with_column(ColumnModel::new("owner_agent_id", "bigint")),
                ),
        );
        assert!(entity(&entities, "licenses").relationships.is_empty());
        assert!(match_target("owner_agent_id", "licenses", &entities).is_none());
    }

    #[test]
    fn test_no_self_reference() {
        let entities = resolve(
            ModelGraph::new().with_table(
                keyed("dim_owners", "owner_id")
                    .with_column(ColumnModel::new("parent_owner_id", "bigint")),
            ),
        );
        assert!(entity(&entities, "owners").relationships.is_empty());
    }

    #[test]
    fn test_unknown_explicit_target_falls_back_to_name() {
        let entities = resolve(
            ModelGraph::new()
                .with_table(keyed("dim_owners", "owner_id"))
                .with_table(
                    keyed("dim_licenses", "license_id")
                        .with_column(
                            ColumnModel::new("owner_id", "bigint")
                                .references("dim_parties", "party_id"),
                        ),
                ),
        );
        let rel = &entity(&entities, "licenses").relationships["licenses_to_owners"];
        assert_eq!(rel.source, RelationshipSource::NameMatch);
    }

    #[test]
    fn test_explicit_field_must_exist() {
        let entities = resolve(
            ModelGraph::new()
                .with_table(keyed("dim_owners", "owner_id"))
                .with_table(
                    keyed("dim_licenses", "license_id").with_column(
                        ColumnModel::new("holder_id", "bigint")
                            .references("dim_owners", "missing_field"),
                    ),
                ),
        );
        assert!(entity(&entities, "licenses").relationships.is_empty());
    }

    #[test]
    fn test_explicit_target_by_entity_name() {
        let entities = resolve(
            ModelGraph::new()
                .with_table(keyed("dim_owners", "owner_id"))
                .with_table(
                    keyed("dim_licenses", "license_id").with_column(
                        ColumnModel::new("holder_id", "bigint").references("owners", "owner_id"),
                    ),
                ),
        );
        let rel = &entity(&entities, "licenses").relationships["licenses_to_owners"];
        assert_eq!(rel.source, RelationshipSource::Explicit);
        assert_eq!(rel.from_column(), "holder_id");
    }

    #[test]
    fn test_target_without_key_dropped() {
        let entities = resolve(
            ModelGraph::new()
                .with_table(TableModel::new("dim_regions"))
                .with_table(
                    keyed("dim_licenses", "license_id")
                        .with_column(ColumnModel::new("region_id", "bigint")),
                ),
        );
        assert!(entity(&entities, "licenses").relationships.is_empty());
    }

    #[test]
    fn test_only_identifier_columns_link() {
        let entities = resolve(
            ModelGraph::new()
                .with_table(keyed("dim_owners", "owner_id"))
                .with_table(
                    keyed("dim_licenses", "license_id").with_column(
                        ColumnModel::new("owner_name", "varchar")
                            .with_test(ColumnTest::NotNull),
                    ),
                ),
        );
        assert!(entity(&entities, "licenses").relationships.is_empty());
    }
}
