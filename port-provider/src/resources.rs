//! Resource types managed by the catalog provider

use port_core::provider::ResourceType;
use port_core::resource::ResourceKind;

// =============================================================================
// Resource Type Definitions
// =============================================================================

macro_rules! define_resource_type {
    ($name:ident, $type_name:expr, $kind:expr, $description:expr) => {
        pub struct $name;
        impl ResourceType for $name {
            fn name(&self) -> &'static str {
                $type_name
            }
            fn kind(&self) -> ResourceKind {
                $kind
            }
            fn description(&self) -> &'static str {
                $description
            }
        }
    };
}

define_resource_type!(
    BlueprintType,
    "port_blueprint",
    ResourceKind::Blueprint,
    "Blueprint declaring the properties and relations of its entities"
);
define_resource_type!(
    EntityType,
    "port_entity",
    ResourceKind::Entity,
    "Catalog entity belonging to a blueprint"
);
define_resource_type!(
    ScorecardType,
    "port_scorecard",
    ResourceKind::Scorecard,
    "Scorecard rules evaluated against the entities of a blueprint"
);

/// Returns all resource types supported by this provider
pub fn resource_types() -> Vec<Box<dyn ResourceType>> {
    vec![
        Box::new(BlueprintType),
        Box::new(EntityType),
        Box::new(ScorecardType),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_type_per_kind() {
        let types = resource_types();
        let names: Vec<_> = types.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["port_blueprint", "port_entity", "port_scorecard"]);
        assert_eq!(types[0].kind(), ResourceKind::Blueprint);
        assert_eq!(types[1].kind(), ResourceKind::Entity);
        assert_eq!(types[2].kind(), ResourceKind::Scorecard);
        assert!(types.iter().all(|t| !t.description().is_empty()));
    }
}
