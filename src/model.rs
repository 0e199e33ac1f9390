//! Entity metadata.
//!
//! The visitor never reflects over concrete types. Entities register their
//! attribute graph once in a [`Schema`], and selector resolution only asks the
//! [`EntityModel`] capability for the attribute named by each path segment.

use std::{collections::HashMap, fmt, fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Declared type of an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttributeType {
    String,
    /// 32-bit integer
    Integer,
    /// 64-bit integer
    Long,
    Double,
    Decimal,
    Boolean,
    /// Calendar date without time zone
    Date,
    /// Instant, compared in UTC
    DateTime,
    /// Symbolic constants, matched case-sensitively
    Enum { name: String, variants: Vec<String> },
    /// Reference to another registered entity
    Entity { name: String },
}

impl AttributeType {
    pub fn enumeration<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AttributeType::Enum {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }

    pub fn entity(name: impl Into<String>) -> Self {
        AttributeType::Entity { name: name.into() }
    }

    /// Name of the referenced entity, for attributes that can be traversed.
    pub fn entity_name(&self) -> Option<&str> {
        match self {
            AttributeType::Entity { name } => Some(name),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            AttributeType::Integer
                | AttributeType::Long
                | AttributeType::Double
                | AttributeType::Decimal
        )
    }

    /// Whether values of this type have a total order usable by range operators.
    pub fn is_ordered(&self) -> bool {
        self.is_numeric()
            || matches!(
                self,
                AttributeType::String | AttributeType::Date | AttributeType::DateTime
            )
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeType::String => f.write_str("string"),
            AttributeType::Integer => f.write_str("integer"),
            AttributeType::Long => f.write_str("long"),
            AttributeType::Double => f.write_str("double"),
            AttributeType::Decimal => f.write_str("decimal"),
            AttributeType::Boolean => f.write_str("boolean"),
            AttributeType::Date => f.write_str("date"),
            AttributeType::DateTime => f.write_str("date-time"),
            AttributeType::Enum { name, .. } => write!(f, "enum {}", name),
            AttributeType::Entity { name } => write!(f, "entity {}", name),
        }
    }
}

/// Whether an attribute holds one value or a collection of values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Multiplicity {
    #[default]
    Single,
    Collection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: AttributeType,
    #[serde(default)]
    pub multiplicity: Multiplicity,
}

impl Attribute {
    pub fn is_collection(&self) -> bool {
        self.multiplicity == Multiplicity::Collection
    }

    /// Whether a selector may continue past this attribute.
    pub fn is_traversable(&self) -> bool {
        self.ty.entity_name().is_some()
    }
}

/// Metadata lookup used during selector resolution.
pub trait EntityModel {
    /// The attribute `name` declared on `entity`, if any.
    fn attribute(&self, entity: &str, name: &str) -> Option<&Attribute>;

    fn contains_entity(&self, entity: &str) -> bool;
}

/// Attribute declarations of a single entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityType {
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl EntityType {
    pub fn new(name: impl Into<String>) -> Self {
        EntityType {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Declare a single-valued attribute.
    pub fn attribute(mut self, name: impl Into<String>, ty: AttributeType) -> Self {
        self.attributes.push(Attribute {
            name: name.into(),
            ty,
            multiplicity: Multiplicity::Single,
        });
        self
    }

    /// Declare a collection-valued attribute; `element` is the element type.
    pub fn collection(mut self, name: impl Into<String>, element: AttributeType) -> Self {
        self.attributes.push(Attribute {
            name: name.into(),
            ty: element,
            multiplicity: Multiplicity::Collection,
        });
        self
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read schema: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid schema: {0}")]
    Json(#[from] serde_json::Error),

    #[error("attribute {entity}.{attribute} references unregistered entity '{target}'")]
    UnknownReference {
        entity: String,
        attribute: String,
        target: String,
    },
}

/// Registry of entity types, the default [`EntityModel`].
///
/// # Examples
///
/// ```
/// use fiql_predicate::model::{AttributeType, EntityModel, EntityType, Schema};
///
/// let schema = Schema::new()
///     .register(EntityType::new("Owner").attribute("firstName", AttributeType::String))
///     .register(
///         EntityType::new("Pet")
///             .attribute("name", AttributeType::String)
///             .attribute("owner", AttributeType::entity("Owner")),
///     );
///
/// assert!(schema.attribute("Pet", "owner").unwrap().is_traversable());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<EntityType>", into = "Vec<EntityType>")]
pub struct Schema {
    entities: HashMap<String, EntityType>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, entity: EntityType) -> Self {
        self.entities.insert(entity.name.clone(), entity);
        self
    }

    pub fn entity(&self, name: &str) -> Option<&EntityType> {
        self.entities.get(name)
    }

    /// Load a schema from a JSON array of entity declarations.
    ///
    /// ```text
    /// [{"name": "Pet", "attributes": [
    ///     {"name": "name", "type": {"kind": "string"}},
    ///     {"name": "visits", "type": {"kind": "entity", "name": "Visit"}, "multiplicity": "collection"}
    /// ]}]
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        let schema: Schema = serde_json::from_str(json)?;
        schema.validate()?;
        Ok(schema)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    /// Check that every entity reference points at a registered entity.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for entity in self.entities.values() {
            for attribute in &entity.attributes {
                if let Some(target) = attribute.ty.entity_name()
                    && !self.entities.contains_key(target)
                {
                    return Err(SchemaError::UnknownReference {
                        entity: entity.name.clone(),
                        attribute: attribute.name.clone(),
                        target: target.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl From<Vec<EntityType>> for Schema {
    fn from(entities: Vec<EntityType>) -> Self {
        entities.into_iter().fold(Schema::new(), Schema::register)
    }
}

impl From<Schema> for Vec<EntityType> {
    fn from(schema: Schema) -> Self {
        let mut entities: Vec<_> = schema.entities.into_values().collect();
        entities.sort_by(|a, b| a.name.cmp(&b.name));
        entities
    }
}

impl EntityModel for Schema {
    fn attribute(&self, entity: &str, name: &str) -> Option<&Attribute> {
        self.entities.get(entity)?.get(name)
    }

    fn contains_entity(&self, entity: &str) -> bool {
        self.entities.contains_key(entity)
    }
}
