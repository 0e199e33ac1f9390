use std::fmt;

use tracing::debug;

use crate::{
    config::VisitorConfig,
    model::{AttributeType, EntityModel, Multiplicity},
    visitor::VisitError,
};

/// Separator between the segments of a selector.
pub const PATH_SEPARATOR: char = '.';

/// One resolved hop of a selector.
///
/// # Examples
/// - `name` → `[name: string]`
/// - `owner.firstName` → `[owner: entity Owner, firstName: string]`
/// - `visits.date` → `[visits: entity Visit (collection), date: date-time]`
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    pub name: String,

    /// Declared type; for collections, the element type
    pub ty: AttributeType,

    pub multiplicity: Multiplicity,
}

impl PathSegment {
    pub fn is_collection(&self) -> bool {
        self.multiplicity == Multiplicity::Collection
    }
}

/// A selector resolved against the entity model.
///
/// Always holds at least the target attribute. Collection-valued hops before
/// the target are joins: a backend matches an entity when *some* element
/// reached through them satisfies the comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributePath {
    hops: Vec<PathSegment>,
    target: PathSegment,
}

impl AttributePath {
    pub fn new(hops: Vec<PathSegment>, target: PathSegment) -> Self {
        AttributePath { hops, target }
    }

    /// Hops leading to the target, root first.
    pub fn hops(&self) -> &[PathSegment] {
        &self.hops
    }

    /// The attribute the selector names.
    pub fn target(&self) -> &PathSegment {
        &self.target
    }

    pub fn target_type(&self) -> &AttributeType {
        &self.target.ty
    }

    /// Whether the target attribute itself is a collection.
    pub fn is_collection_valued(&self) -> bool {
        self.target.is_collection()
    }

    /// Whether any hop before the target crosses a collection.
    pub fn has_collection_hop(&self) -> bool {
        self.hops.iter().any(PathSegment::is_collection)
    }

    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.hops.iter().chain(std::iter::once(&self.target))
    }

    /// Number of segments, target included.
    pub fn depth(&self) -> usize {
        self.hops.len() + 1
    }

    /// The dotted internal selector.
    pub fn selector(&self) -> String {
        self.segments()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.selector())
    }
}

/// Resolve an external selector to a typed path below `root`.
///
/// The allow-list is checked first, against the selector as written. Only
/// then is the selector translated through the alias map and walked through
/// the attribute graph, so a forbidden selector is rejected whether or not
/// the attribute exists.
///
/// # Examples
/// ```text
/// born          → birthDate → [birthDate: date]
/// visits.type   → [visits (collection), type: enum VisitType]
/// ```
pub fn resolve<M: EntityModel + ?Sized>(
    selector: &str,
    config: &VisitorConfig,
    model: &M,
    root: &str,
) -> Result<AttributePath, VisitError> {
    if !config.is_allowed(selector) {
        return Err(VisitError::SelectorNotAllowed {
            selector: selector.to_string(),
        });
    }

    if !model.contains_entity(root) {
        return Err(VisitError::UnknownEntity(root.to_string()));
    }

    let internal = config.map_selector(selector);
    let mut entity = root.to_string();
    let mut segments = internal.split(PATH_SEPARATOR).peekable();
    let mut hops = Vec::new();

    while let Some(name) = segments.next() {
        let attribute =
            model
                .attribute(&entity, name)
                .ok_or_else(|| VisitError::UnknownAttribute {
                    selector: selector.to_string(),
                    entity: entity.clone(),
                    segment: name.to_string(),
                })?;

        let segment = PathSegment {
            name: attribute.name.clone(),
            ty: attribute.ty.clone(),
            multiplicity: attribute.multiplicity,
        };

        if segments.peek().is_none() {
            let path = AttributePath::new(hops, segment);
            debug!(selector, resolved = %path, target = %path.target_type(), "resolved selector");
            return Ok(path);
        }

        // Collections are followed through their element type.
        match attribute.ty.entity_name() {
            Some(next) => entity = next.to_string(),
            None => {
                return Err(VisitError::NotTraversable {
                    selector: selector.to_string(),
                    segment: name.to_string(),
                    ty: attribute.ty.clone(),
                });
            }
        }
        hops.push(segment);
    }

    // `split` always yields at least one segment.
    Err(VisitError::UnknownAttribute {
        selector: selector.to_string(),
        entity,
        segment: String::new(),
    })
}
