/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the compilation inputs
///
/// Submodules:
/// - ast: Compilation units, functions, classes, and parameters
/// - expressions: Definitions for various expression types
/// - statements: Definitions for various statement types
/// - types: The static type model attached to typed IR nodes
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
