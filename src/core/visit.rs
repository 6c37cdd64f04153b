//! Read-only traversal over the syntax tree, in the style of `syn::visit`.
//!
//! Override a `visit_*` method to observe a node kind and call the matching
//! `walk_*` function to keep descending.

use super::ast::{
    Annotation, AnonymousBody, Block, ClassDecl, CompilationUnit, Expr, FieldDecl, Member,
    MethodCall, MethodDecl, Stmt, TypeRef,
};

pub trait Visit {
    fn visit_unit(&mut self, unit: &CompilationUnit) {
        walk_unit(self, unit);
    }

    fn visit_class(&mut self, class: &ClassDecl) {
        walk_class(self, class);
    }

    fn visit_member(&mut self, member: &Member) {
        walk_member(self, member);
    }

    fn visit_field(&mut self, field: &FieldDecl) {
        walk_field(self, field);
    }

    fn visit_method(&mut self, method: &MethodDecl) {
        walk_method(self, method);
    }

    fn visit_annotation(&mut self, annotation: &Annotation) {
        walk_annotation(self, annotation);
    }

    fn visit_type_ref(&mut self, _ty: &TypeRef) {}

    fn visit_block(&mut self, block: &Block) {
        walk_block(self, block);
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    fn visit_call(&mut self, call: &MethodCall) {
        walk_call(self, call);
    }

    fn visit_anonymous_body(&mut self, body: &AnonymousBody) {
        walk_anonymous_body(self, body);
    }
}

pub fn walk_unit<V: Visit + ?Sized>(v: &mut V, unit: &CompilationUnit) {
    for class in &unit.types {
        v.visit_class(class);
    }
}

pub fn walk_class<V: Visit + ?Sized>(v: &mut V, class: &ClassDecl) {
    for annotation in &class.annotations {
        v.visit_annotation(annotation);
    }
    for member in &class.members {
        v.visit_member(member);
    }
}

pub fn walk_member<V: Visit + ?Sized>(v: &mut V, member: &Member) {
    match member {
        Member::Field(field) => v.visit_field(field),
        Member::Method(method) => v.visit_method(method),
        Member::Class(class) => v.visit_class(class),
        Member::Initializer(block) => v.visit_block(block),
    }
}

pub fn walk_field<V: Visit + ?Sized>(v: &mut V, field: &FieldDecl) {
    for annotation in &field.annotations {
        v.visit_annotation(annotation);
    }
    v.visit_type_ref(&field.ty);
    if let Some(init) = &field.initializer {
        v.visit_expr(init);
    }
}

pub fn walk_method<V: Visit + ?Sized>(v: &mut V, method: &MethodDecl) {
    for annotation in &method.annotations {
        v.visit_annotation(annotation);
    }
    v.visit_type_ref(&method.return_type);
    for param in &method.params {
        v.visit_type_ref(&param.ty);
    }
    for thrown in &method.throws {
        v.visit_type_ref(thrown);
    }
    if let Some(body) = &method.body {
        v.visit_block(body);
    }
}

pub fn walk_annotation<V: Visit + ?Sized>(v: &mut V, annotation: &Annotation) {
    for arg in &annotation.args {
        v.visit_expr(&arg.value);
    }
}

pub fn walk_block<V: Visit + ?Sized>(v: &mut V, block: &Block) {
    for stmt in &block.statements {
        v.visit_stmt(stmt);
    }
}

pub fn walk_stmt<V: Visit + ?Sized>(v: &mut V, stmt: &Stmt) {
    match stmt {
        Stmt::Expr(expr) => v.visit_expr(expr),
        Stmt::Local(local) => {
            v.visit_type_ref(&local.ty);
            if let Some(init) = &local.initializer {
                v.visit_expr(init);
            }
        }
        Stmt::Return(Some(expr)) => v.visit_expr(expr),
        Stmt::Return(None) | Stmt::Opaque(_) => {}
        Stmt::Block(block) => v.visit_block(block),
    }
}

pub fn walk_expr<V: Visit + ?Sized>(v: &mut V, expr: &Expr) {
    match expr {
        Expr::ClassLiteral(ty) => v.visit_type_ref(ty),
        Expr::FieldAccess { target, .. } => v.visit_expr(target),
        Expr::Call(call) => v.visit_call(call),
        Expr::New(new) => {
            v.visit_type_ref(&new.ty);
            for arg in &new.args {
                v.visit_expr(arg);
            }
            if let Some(body) = &new.body {
                v.visit_anonymous_body(body);
            }
        }
        Expr::Ident(_) | Expr::Literal(_) | Expr::Opaque(_) => {}
    }
}

pub fn walk_call<V: Visit + ?Sized>(v: &mut V, call: &MethodCall) {
    if let Some(receiver) = &call.receiver {
        v.visit_expr(receiver);
    }
    for arg in &call.args {
        v.visit_expr(arg);
    }
}

pub fn walk_anonymous_body<V: Visit + ?Sized>(v: &mut V, body: &AnonymousBody) {
    for member in &body.members {
        v.visit_member(member);
    }
}
