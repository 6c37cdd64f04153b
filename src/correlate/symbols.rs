use crate::core::{ClassDecl, TypeRef};
use crate::matchers::MockFieldBinding;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSymbol {
    pub member: usize,
    pub ty: TypeRef,
    /// Index into the model's mock fields, when the field is a mock
    pub mock: Option<usize>,
}

/// Fields of one class keyed by declared name.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    fields: HashMap<String, FieldSymbol>,
}

impl SymbolTable {
    pub fn from_class(class: &ClassDecl) -> Self {
        let fields = class
            .fields()
            .map(|(member, field)| {
                (
                    field.name.clone(),
                    FieldSymbol {
                        member,
                        ty: field.ty.clone(),
                        mock: None,
                    },
                )
            })
            .collect();
        Self { fields }
    }

    pub fn register_mocks(&mut self, mocks: &[MockFieldBinding]) {
        for (index, mock) in mocks.iter().enumerate() {
            if let Some(symbol) = self.fields.get_mut(&mock.field_name) {
                symbol.mock = Some(index);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldSymbol> {
        self.fields.get(name)
    }

    /// Index of the mock field declared under `name`
    pub fn resolve_mock(&self, name: &str) -> Option<usize> {
        self.get(name).and_then(|s| s.mock)
    }

    pub fn field_names(&self) -> HashSet<String> {
        self.fields.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FieldDecl, Member};
    use crate::matchers::MockForm;

    #[test]
    fn test_resolves_only_registered_mocks() {
        let class = ClassDecl::new("A")
            .with_member(Member::Field(FieldDecl::new(
                TypeRef::of("java.util.List"),
                "mockedList",
            )))
            .with_member(Member::Field(FieldDecl::new(
                TypeRef::of("java.lang.String"),
                "expected",
            )));
        let mut symbols = SymbolTable::from_class(&class);
        symbols.register_mocks(&[MockFieldBinding {
            member: 0,
            field_name: "mockedList".into(),
            declared_type: TypeRef::of("java.util.List"),
            form: MockForm::Annotated,
            mock_name: None,
        }]);

        assert_eq!(symbols.resolve_mock("mockedList"), Some(0));
        assert_eq!(symbols.resolve_mock("expected"), None);
        assert_eq!(symbols.get("expected").map(|s| s.member), Some(1));
        assert_eq!(symbols.resolve_mock("missing"), None);
        assert_eq!(symbols.field_names().len(), 2);
    }
}
