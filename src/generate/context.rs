//! Per-entity generation context.
//!
//! Everything the artifact builders share about one entity: the relation it
//! reads from, the column to parameter mapping, the default ordering, the
//! common filter set and the return shape.

use super::artifact::{Artifact, ArtifactKind};
use super::schema::{json_type, JsonType, Parameter, ParameterList, Property, ReturnSchema};
use super::template::{OptionalFilter, QueryTemplate, RowCap};
use crate::config::{GenerationSettings, Settings};
use crate::semantic::{Column, Entity, NamingTransform, ParameterNames, SemanticRole};
use crate::sql::{cast, col, param, DataType, Expr, ExprExt, TableRef};

/// The relation an entity's templates read from: the physical relation plus
/// the configured suffix, schema-qualified when asked to.
pub fn source_table(entity: &Entity, settings: &GenerationSettings) -> TableRef {
    let relation = format!("{}{}", entity.table, settings.relation_suffix);
    let table = TableRef::new(&relation);
    match &entity.schema {
        Some(schema) if settings.qualify_schema => table.with_schema(schema),
        _ => table,
    }
}

/// Shared inputs for building one entity's artifacts.
pub struct EntityContext<'a> {
    pub entity: &'a Entity,
    pub settings: &'a GenerationSettings,
    pub names: ParameterNames,
}

impl<'a> EntityContext<'a> {
    pub fn new(entity: &'a Entity, settings: &'a Settings) -> Self {
        let transform = NamingTransform::new(&settings.naming);
        let names =
            ParameterNames::build(&transform, entity.columns.iter().map(|c| c.name.as_str()));
        Self {
            entity,
            settings: &settings.generation,
            names,
        }
    }

    pub fn source(&self) -> TableRef {
        source_table(self.entity, self.settings)
    }

    /// Parameter name owned by a column. `None` for a column that lost its
    /// name to an earlier column.
    pub fn param_name(&self, column: &Column) -> Option<&str> {
        self.names.parameter(&column.name)
    }

    /// Columns carrying one of `roles`, in declaration order.
    pub fn columns_with_roles<'r>(
        &self,
        roles: &'r [SemanticRole],
    ) -> impl Iterator<Item = &'a Column> + 'r
    where
        'a: 'r,
    {
        let entity: &'a Entity = self.entity;
        entity
            .columns
            .iter()
            .filter(move |c| roles.contains(&c.role))
    }

    pub fn primary_key(&self) -> Option<&'a Column> {
        self.entity.primary_key_column()
    }

    /// Default ordering column: a temporal column mentioning creation or
    /// issue, else the primary key.
    pub fn order_column(&self) -> Option<&'a Column> {
        self.entity
            .columns_with_role(SemanticRole::Temporal)
            .find(|c| {
                let name = c.name.to_lowercase();
                name.contains("created") || name.contains("issue")
            })
            .or_else(|| self.primary_key())
    }

    /// Return shape of a row of the entity, capped at the configured number
    /// of properties.
    pub fn return_schema(&self) -> ReturnSchema {
        ReturnSchema::new(
            self.entity
                .columns
                .iter()
                .take(self.settings.max_return_properties)
                .map(Property::from_column)
                .collect(),
        )
    }

    /// Exact-match filters on the first categorical/status columns and
    /// date-range filters on the first temporal columns.
    ///
    /// Declares each filter's parameter in `params` and returns only the
    /// filters whose parameter was accepted.
    pub fn common_filters(&self, params: &mut ParameterList) -> Vec<OptionalFilter> {
        let mut filters = Vec::new();

        let categories = self
            .columns_with_roles(&[SemanticRole::Categorical, SemanticRole::BusinessStatus])
            .filter_map(|c| self.param_name(c).map(|p| (c, p)))
            .take(self.settings.max_category_filters);
        for (column, name) in categories {
            let name = format!("filter{}", name);
            let mut parameter = Parameter::new(
                &name,
                json_type(&column.data_type),
                &format!("Filter by {}", column.name),
            );
            if column.is_enumerated() {
                parameter = parameter.with_enum(&column.enum_values);
            }
            if params.add(parameter.optional()) {
                filters.push(OptionalFilter::new(&name, col(&column.name).eq(param(&name))));
            }
        }

        let dates = self
            .entity
            .columns_with_role(SemanticRole::Temporal)
            .filter_map(|c| self.param_name(c).map(|p| (c, p)))
            .take(self.settings.max_date_filters);
        for (column, name) in dates {
            let day = cast(col(&column.name), DataType::Date);
            let bounds = [
                (format!("{}From", name), "on or after", true),
                (format!("{}To", name), "on or before", false),
            ];
            for (bound, phrase, lower) in bounds {
                let parameter = Parameter::string(&bound, &format!("{} {}", column.name, phrase))
                    .with_format("date")
                    .optional();
                if !params.add(parameter) {
                    continue;
                }
                let value = cast(param(&bound), DataType::Date);
                let predicate = if lower {
                    day.clone().gte(value)
                } else {
                    day.clone().lte(value)
                };
                filters.push(OptionalFilter::new(&bound, predicate));
            }
        }

        filters
    }

    /// Asymmetric row cap switched by the given filters.
    pub fn row_cap(&self, filters: &[OptionalFilter]) -> RowCap {
        RowCap {
            unfiltered: self.settings.row_caps.unfiltered,
            filtered: self.settings.row_caps.filtered,
            filter_params: filters.iter().map(|f| f.param.clone()).collect(),
        }
    }

    /// Expression usable as a string: the column itself when string-typed,
    /// otherwise cast to the dialect's string type.
    pub fn text_expr(&self, column: &Column) -> Expr {
        if column.is_string_typed() {
            col(&column.name)
        } else {
            cast(col(&column.name), DataType::String)
        }
    }

    /// Expression usable in arithmetic: cast to DOUBLE when the declared
    /// type is known and not numeric.
    pub fn numeric_expr(&self, column: &Column) -> Expr {
        match column.parsed_type() {
            Some(dt) if !dt.is_numeric() => cast(col(&column.name), DataType::Float64),
            _ => col(&column.name),
        }
    }

    /// Render and package an artifact.
    pub fn finish(
        &self,
        kind: ArtifactKind,
        name: String,
        description: String,
        params: ParameterList,
        returns: ReturnSchema,
        template: QueryTemplate,
    ) -> Artifact {
        let sql = template.render(self.settings.dialect);
        tracing::debug!(
            entity = %self.entity.name,
            artifact = %name,
            %kind,
            parameters = params.names().len(),
            "built artifact"
        );
        Artifact {
            name,
            kind,
            entity: self.entity.name.clone(),
            description,
            format_version: self.settings.format_version.clone(),
            parameters: params.into_vec(),
            returns,
            template,
            sql,
        }
    }
}

/// Property for a count column.
pub fn count_property(name: &str, description: &str) -> Property {
    let mut prop = Property::new(name, JsonType::Integer);
    prop.description = Some(description.into());
    prop
}

/// Property for a value re-labelled as text (dimensions, group labels).
pub fn text_property(name: &str, description: &str) -> Property {
    let mut prop = Property::new(name, JsonType::String);
    prop.description = Some(description.into());
    prop
}
