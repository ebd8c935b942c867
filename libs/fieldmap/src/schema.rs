/// A single declared field.
///
/// `type_name` is the declared Rust type rendered as text (`"u32"`,
/// `"Option<String>"`). It is informational only; values are never
/// validated against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Field {
    pub name: &'static str,
    pub type_name: &'static str,
}

/// Name and position of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub position: usize,
}

/// Static schema of a record type, resolved at type-definition time.
///
/// Field position in `fields` is its declaration order and its index for
/// positional access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Schema {
    /// Unqualified type name, e.g. `"Point"`.
    pub type_name: &'static str,
    /// Module the type was declared in, as reported by `module_path!()`.
    pub module_path: &'static str,
    pub fields: &'static [Field],
}

impl Schema {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Position of the field called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn name(&self, position: usize) -> Option<&'static str> {
        self.fields.get(position).map(|f| f.name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn descriptors(&self) -> impl ExactSizeIterator<Item = FieldDescriptor> + '_ {
        self.fields
            .iter()
            .enumerate()
            .map(|(position, f)| FieldDescriptor {
                name: f.name,
                position,
            })
    }

    /// `module_path::type_name`, the identity used by the registry.
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.module_path, self.type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: Schema = Schema {
        type_name: "Pair",
        module_path: "demo",
        fields: &[
            Field {
                name: "left",
                type_name: "i32",
            },
            Field {
                name: "right",
                type_name: "String",
            },
        ],
    };

    #[test]
    fn position_and_name_are_inverse() {
        for d in SCHEMA.descriptors() {
            assert_eq!(SCHEMA.position(d.name), Some(d.position));
            assert_eq!(SCHEMA.name(d.position), Some(d.name));
        }
        assert_eq!(SCHEMA.position("middle"), None);
        assert_eq!(SCHEMA.name(2), None);
    }

    #[test]
    fn serializes_field_types() {
        let json = serde_json::to_string(&SCHEMA).unwrap();
        assert_eq!(
            json,
            r#"{"type_name":"Pair","module_path":"demo","fields":[{"name":"left","type_name":"i32"},{"name":"right","type_name":"String"}]}"#
        );
    }

    #[test]
    fn qualified_name_joins_module() {
        assert_eq!(SCHEMA.qualified_name(), "demo::Pair");
    }
}
