//! Blueprint - The blueprint resource
//!
//! The wire record is `schema::Blueprint`, shared with the entity mappers.
//! `model` holds the typed configuration containers and `to_body` / `to_state`
//! translate between the two.

pub mod model;
mod to_body;
mod to_state;

pub use model::{
    AggregationMethod, AggregationPropertyModel, ArrayPropModel, BlueprintModel,
    BlueprintPropertiesModel, BooleanPropModel, ItemsModel, NumberPropModel, ObjectPropModel,
    PropertyMetaModel, StringItemsModel, StringPropModel,
};
pub use to_body::blueprint_to_body;
pub use to_state::refresh_blueprint_state;
