//! Data types shared by all entities: custom attributes, document positions
//! and server-local timestamps.

mod attribute;
mod datetime;
mod position;

pub use attribute::{
    attribute_meta, AttributeBuilder, AttributeType, AttributeValue, AttributesExt,
    EntityAttribute, EntityRef,
};
pub use datetime::{ServerDateTime, TimeZones, SERVER_DATE_FORMAT, SERVER_TIME_ZONE};
pub use position::Position;
