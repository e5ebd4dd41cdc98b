use bitflags::bitflags;
use oas3::spec::{ObjectSchema, SchemaType, SchemaTypeSet};

bitflags! {
  /// The `type` keyword of a schema folded into a set. A schema may name several types at once.
  #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
  pub struct TypeFlags: u8 {
    const STRING = 1;
    const INTEGER = 1 << 1;
    const NUMBER = 1 << 2;
    const BOOLEAN = 1 << 3;
    const NULL = 1 << 4;
    const OBJECT = 1 << 5;
    const ARRAY = 1 << 6;
  }
}

impl TypeFlags {
  #[must_use]
  pub fn of(schema: &ObjectSchema) -> Self {
    match &schema.schema_type {
      None => Self::empty(),
      Some(SchemaTypeSet::Single(single)) => Self::from(*single),
      Some(SchemaTypeSet::Multiple(types)) => types.iter().copied().map(Self::from).collect(),
    }
  }
}

impl From<SchemaType> for TypeFlags {
  fn from(value: SchemaType) -> Self {
    match value {
      SchemaType::String => Self::STRING,
      SchemaType::Integer => Self::INTEGER,
      SchemaType::Number => Self::NUMBER,
      SchemaType::Boolean => Self::BOOLEAN,
      SchemaType::Null => Self::NULL,
      SchemaType::Object => Self::OBJECT,
      SchemaType::Array => Self::ARRAY,
    }
  }
}
