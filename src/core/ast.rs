//! Syntax tree model for Java test sources.
//!
//! Nodes are immutable values that own their children. Sequences that the
//! emitter edits (imports, type declarations, class members, annotations and
//! block statements) are `im::Vector`s so rewritten trees share structure
//! with the input they were derived from. There are no parent pointers:
//! callers that need to go upward carry a [`NodePath`](super::path::NodePath).
//!
//! Type resolution performed by the external parser is carried on the nodes
//! as optional fully qualified names. A `None` means "unresolved" and every
//! matcher treats it as a non-match.

use im::Vector;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationUnit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub imports: Vector<Import>,
    #[serde(default)]
    pub types: Vector<ClassDecl>,
}

impl CompilationUnit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_import(mut self, import: Import) -> Self {
        self.imports.push_back(import);
        self
    }

    pub fn with_type(mut self, class: ClassDecl) -> Self {
        self.types.push_back(class);
        self
    }

    pub fn has_import(&self, path: &str, is_static: bool) -> bool {
        self.imports
            .iter()
            .any(|i| i.path == path && i.is_static == is_static)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Import {
    /// Dotted path as written, e.g. `org.mockito.Mockito.when` or `org.mockito.Mockito.*`
    pub path: String,
    #[serde(default)]
    pub is_static: bool,
}

impl Import {
    pub fn type_import(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_static: false,
        }
    }

    pub fn static_import(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_static: true,
        }
    }

    /// Last path segment: the imported type, member, or `*`
    pub fn simple_name(&self) -> &str {
        simple_name(&self.path)
    }

    /// Everything before the last segment
    pub fn qualifier(&self) -> &str {
        self.path
            .rsplit_once('.')
            .map(|(head, _)| head)
            .unwrap_or("")
    }

    pub fn is_wildcard(&self) -> bool {
        self.simple_name() == "*"
    }
}

/// Last segment of a dotted name.
pub fn simple_name(qualified: &str) -> &str {
    qualified
        .rsplit_once('.')
        .map(|(_, tail)| tail)
        .unwrap_or(qualified)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Final,
    Abstract,
}

impl Modifier {
    pub fn keyword(&self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Abstract => "abstract",
        }
    }
}

/// A type as written in source plus its resolved name, if known.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    /// Source spelling including type arguments, e.g. `List<String>`
    pub name: String,
    #[serde(default)]
    pub fqn: Option<String>,
}

impl TypeRef {
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fqn: None,
        }
    }

    pub fn resolved(name: impl Into<String>, fqn: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fqn: Some(fqn.into()),
        }
    }

    /// Reference a type by its fully qualified name, spelled with the simple name.
    pub fn of(fqn: &str) -> Self {
        Self::resolved(simple_name(fqn), fqn)
    }

    pub fn is(&self, fqn: &str) -> bool {
        self.fqn.as_deref() == Some(fqn)
    }

    pub fn is_any_of(&self, fqns: &[String]) -> bool {
        self.fqn
            .as_deref()
            .is_some_and(|own| fqns.iter().any(|f| f == own))
    }

    /// Spelling without type arguments
    pub fn base_name(&self) -> &str {
        self.name
            .split_once('<')
            .map(|(base, _)| base)
            .unwrap_or(&self.name)
            .trim()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationArg {
    /// `None` for the single unnamed `value` argument
    #[serde(default)]
    pub name: Option<String>,
    pub value: Expr,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,
    #[serde(default)]
    pub fqn: Option<String>,
    #[serde(default)]
    pub args: Vec<AnnotationArg>,
}

impl Annotation {
    /// Marker annotation (`@Name`) for a fully qualified annotation type
    pub fn marker(fqn: &str) -> Self {
        Self {
            name: simple_name(fqn).to_string(),
            fqn: Some(fqn.to_string()),
            args: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: Expr) -> Self {
        self.args.push(AnnotationArg { name: None, value });
        self
    }

    pub fn with_named(mut self, name: impl Into<String>, value: Expr) -> Self {
        self.args.push(AnnotationArg {
            name: Some(name.into()),
            value,
        });
        self
    }

    pub fn is(&self, fqn: &str) -> bool {
        self.fqn.as_deref() == Some(fqn)
    }

    /// The unnamed argument, or the one explicitly named `value`
    pub fn value(&self) -> Option<&Expr> {
        self.args
            .iter()
            .find(|a| a.name.is_none() || a.name.as_deref() == Some("value"))
            .map(|a| &a.value)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDecl {
    #[serde(default)]
    pub annotations: Vector<Annotation>,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    pub name: String,
    #[serde(default)]
    pub members: Vector<Member>,
}

impl ClassDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push_back(annotation);
        self
    }

    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push_back(member);
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (usize, &FieldDecl)> {
        self.members.iter().enumerate().filter_map(|(i, m)| match m {
            Member::Field(f) => Some((i, f)),
            _ => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = (usize, &MethodDecl)> {
        self.members.iter().enumerate().filter_map(|(i, m)| match m {
            Member::Method(f) => Some((i, f)),
            _ => None,
        })
    }

    pub fn has_annotation(&self, fqn: &str) -> bool {
        self.annotations.iter().any(|a| a.is(fqn))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Member {
    Field(FieldDecl),
    Method(MethodDecl),
    Class(Box<ClassDecl>),
    /// Instance initializer block (`{ ... }`)
    Initializer(Block),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    pub ty: TypeRef,
    pub name: String,
    #[serde(default)]
    pub initializer: Option<Expr>,
}

impl FieldDecl {
    pub fn new(ty: TypeRef, name: impl Into<String>) -> Self {
        Self {
            annotations: Vec::new(),
            modifiers: Vec::new(),
            ty,
            name: name.into(),
            initializer: None,
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_initializer(mut self, init: Expr) -> Self {
        self.initializer = Some(init);
        self
    }

    pub fn has_annotation(&self, fqn: &str) -> bool {
        self.annotations.iter().any(|a| a.is(fqn))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub ty: TypeRef,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecl {
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    pub return_type: TypeRef,
    pub name: String,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub throws: Vec<TypeRef>,
    #[serde(default)]
    pub body: Option<Block>,
}

impl MethodDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            annotations: Vec::new(),
            modifiers: Vec::new(),
            return_type: TypeRef::unresolved("void"),
            name: name.into(),
            params: Vec::new(),
            throws: Vec::new(),
            body: Some(Block::default()),
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_body(mut self, body: Block) -> Self {
        self.body = Some(body);
        self
    }

    pub fn annotation(&self, fqn: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.is(fqn))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub statements: Vector<Stmt>,
}

impl Block {
    pub fn new(statements: impl IntoIterator<Item = Stmt>) -> Self {
        Self {
            statements: statements.into_iter().collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stmt {
    Expr(Expr),
    Local(LocalVar),
    Return(Option<Expr>),
    Block(Block),
    /// A statement the model does not decompose, kept as source text
    Opaque(String),
}

impl Stmt {
    pub fn as_call(&self) -> Option<&MethodCall> {
        match self {
            Stmt::Expr(Expr::Call(call)) => Some(call),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalVar {
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    pub ty: TypeRef,
    pub name: String,
    #[serde(default)]
    pub initializer: Option<Expr>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expr {
    Ident(String),
    Literal(Literal),
    /// `Type.class`
    ClassLiteral(TypeRef),
    FieldAccess { target: Box<Expr>, name: String },
    Call(MethodCall),
    New(NewClass),
    /// An expression the model does not decompose, kept as source text
    Opaque(String),
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn string(value: &str) -> Self {
        Expr::Literal(Literal {
            kind: LiteralKind::String,
            source: format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\"")),
        })
    }

    pub fn int(value: i64) -> Self {
        Expr::Literal(Literal {
            kind: LiteralKind::Integer,
            source: value.to_string(),
        })
    }

    pub fn boolean(value: bool) -> Self {
        Expr::Literal(Literal {
            kind: LiteralKind::Boolean,
            source: value.to_string(),
        })
    }

    pub fn class_literal(ty: TypeRef) -> Self {
        Expr::ClassLiteral(ty)
    }

    pub fn as_call(&self) -> Option<&MethodCall> {
        match self {
            Expr::Call(call) => Some(call),
            _ => None,
        }
    }

    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Expr::Ident(name) => Some(name),
            _ => None,
        }
    }

    /// Leftmost identifier of a receiver chain (`a` in `a.b().c`)
    pub fn root_ident(&self) -> Option<&str> {
        match self {
            Expr::Ident(name) => Some(name),
            Expr::FieldAccess { target, .. } => target.root_ident(),
            Expr::Call(call) => call.receiver.as_deref().and_then(Expr::root_ident),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Literal {
    pub kind: LiteralKind,
    /// Source spelling, including quotes and suffixes
    pub source: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteralKind {
    String,
    Char,
    Integer,
    Floating,
    Boolean,
    Null,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodCall {
    #[serde(default)]
    pub receiver: Option<Box<Expr>>,
    pub name: String,
    #[serde(default)]
    pub args: Vec<Expr>,
    /// Resolved declaring type of the invoked method
    #[serde(default)]
    pub declaring_type: Option<String>,
}

impl MethodCall {
    /// Unqualified call such as `oneOf(x)` or a statically imported `when(...)`
    pub fn bare(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self {
            receiver: None,
            name: name.into(),
            args,
            declaring_type: None,
        }
    }

    pub fn on(receiver: Expr, name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self {
            receiver: Some(Box::new(receiver)),
            name: name.into(),
            args,
            declaring_type: None,
        }
    }

    pub fn declared_by(mut self, fqn: impl Into<String>) -> Self {
        self.declaring_type = Some(fqn.into());
        self
    }

    pub fn into_expr(self) -> Expr {
        Expr::Call(self)
    }

    pub fn into_stmt(self) -> Stmt {
        Stmt::Expr(Expr::Call(self))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClass {
    pub ty: TypeRef,
    #[serde(default)]
    pub args: Vec<Expr>,
    #[serde(default)]
    pub body: Option<AnonymousBody>,
}

/// Body of an anonymous subclass (`new T() { ... }`)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnonymousBody {
    #[serde(default)]
    pub members: Vector<Member>,
}

impl AnonymousBody {
    /// Statements of the sole instance initializer, if the body is exactly one `{ ... }` block
    pub fn single_initializer(&self) -> Option<&Block> {
        match (self.members.len(), self.members.front()) {
            (1, Some(Member::Initializer(block))) => Some(block),
            _ => None,
        }
    }
}
