//! Visitor dispatch over schema declarations.
//!
//! Every declaration kind has a handler on [`Visitor`] whose default is a
//! no-op, so a pass only overrides the kinds it cares about.
//! [`Declaration::accept`] is an exhaustive match: adding a declaration kind
//! does not compile until it has a handler here.
//!
//! Handlers do not descend into composite nodes. A pass that renders a
//! message, enum or service body walks its elements with a fresh pass
//! instance scoped one indentation level deeper.

use crate::ast::{
    Comment, Declaration, Document, Enum, EnumField, Extensions, Group, Import, MapField,
    Message, NormalField, OneOf, OneOfField, OptionDecl, Package, Reserved, Rpc, Service, Syntax,
};

/// Per-kind handlers for a traversal over declarations borrowed for `'ast`.
#[allow(unused_variables)]
pub trait Visitor<'ast> {
    /// Called before dispatching each declaration to its handler.
    fn enter(&mut self, declaration: &'ast Declaration) {}

    /// Visits a whole document in source order.
    fn visit_document(&mut self, document: &'ast Document) {
        walk_declarations(self, &document.declarations);
    }

    /// Visits a syntax statement.
    fn visit_syntax(&mut self, node: &'ast Syntax) {}
    /// Visits a package statement.
    fn visit_package(&mut self, node: &'ast Package) {}
    /// Visits an option statement.
    fn visit_option(&mut self, node: &'ast OptionDecl) {}
    /// Visits an import statement.
    fn visit_import(&mut self, node: &'ast Import) {}
    /// Visits a message definition.
    fn visit_message(&mut self, node: &'ast Message) {}
    /// Visits a service definition.
    fn visit_service(&mut self, node: &'ast Service) {}
    /// Visits an enum definition.
    fn visit_enum(&mut self, node: &'ast Enum) {}
    /// Visits a regular field.
    fn visit_normal_field(&mut self, node: &'ast NormalField) {}
    /// Visits a map field.
    fn visit_map_field(&mut self, node: &'ast MapField) {}
    /// Visits a oneof block.
    fn visit_oneof(&mut self, node: &'ast OneOf) {}
    /// Visits a oneof member field.
    fn visit_oneof_field(&mut self, node: &'ast OneOfField) {}
    /// Visits a group field.
    fn visit_group(&mut self, node: &'ast Group) {}
    /// Visits an enum value.
    fn visit_enum_field(&mut self, node: &'ast EnumField) {}
    /// Visits a standalone comment.
    fn visit_comment(&mut self, node: &'ast Comment) {}
    /// Visits a service method.
    fn visit_rpc(&mut self, node: &'ast Rpc) {}
    /// Visits a reserved statement.
    fn visit_reserved(&mut self, node: &'ast Reserved) {}
    /// Visits an extensions statement.
    fn visit_extensions(&mut self, node: &'ast Extensions) {}
}

impl Declaration {
    /// Dispatches this declaration to the matching handler of `visitor`.
    pub fn accept<'ast, V>(&'ast self, visitor: &mut V)
    where
        V: Visitor<'ast> + ?Sized,
    {
        visitor.enter(self);
        match self {
            Self::Syntax(n) => visitor.visit_syntax(n),
            Self::Package(n) => visitor.visit_package(n),
            Self::Option(n) => visitor.visit_option(n),
            Self::Import(n) => visitor.visit_import(n),
            Self::Message(n) => visitor.visit_message(n),
            Self::Service(n) => visitor.visit_service(n),
            Self::Enum(n) => visitor.visit_enum(n),
            Self::NormalField(n) => visitor.visit_normal_field(n),
            Self::MapField(n) => visitor.visit_map_field(n),
            Self::OneOf(n) => visitor.visit_oneof(n),
            Self::OneOfField(n) => visitor.visit_oneof_field(n),
            Self::Group(n) => visitor.visit_group(n),
            Self::EnumField(n) => visitor.visit_enum_field(n),
            Self::Comment(n) => visitor.visit_comment(n),
            Self::Rpc(n) => visitor.visit_rpc(n),
            Self::Reserved(n) => visitor.visit_reserved(n),
            Self::Extensions(n) => visitor.visit_extensions(n),
        }
    }
}

/// Visits `declarations` in order.
pub fn walk_declarations<'ast, V>(visitor: &mut V, declarations: &'ast [Declaration])
where
    V: Visitor<'ast> + ?Sized,
{
    for declaration in declarations {
        declaration.accept(visitor);
    }
}
