//! Module identifier types.
//!
//! A module identifier is an opaque logical name for a dynamically loadable
//! code unit. Identifiers are globally unique within one running host process
//! and immutable once issued; everything else about a module (its location,
//! its bytes, its handle) hangs off this name.

use serde::{ Deserialize, Serialize };



/// Opaque logical name for a dynamically loadable code unit.
///
/// Used as the cache key for load records and carried on every lifecycle
/// event. The loader never interprets the identifier beyond the chunk-prefix
/// convention checked by [`IdentifierResolver`]( crate::IdentifierResolver ).
#[derive( Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize )]
#[serde( transparent )]
pub struct ModuleId( String );

impl ModuleId {
    /// Creates a new module identifier.
    pub fn new( id: impl Into<String> ) -> Self { Self( id.into() )}

    /// The identifier as a string slice.
    #[inline] pub fn as_str( &self ) -> &str { &self.0 }
}

impl std::fmt::Display for ModuleId {
    fn fmt( &self, f: &mut std::fmt::Formatter ) -> Result<(), std::fmt::Error> {
        std::fmt::Display::fmt( &self.0, f )
    }
}

impl From<&str> for ModuleId {
    fn from( id: &str ) -> Self { Self( id.to_string() )}
}

impl From<String> for ModuleId {
    fn from( id: String ) -> Self { Self( id )}
}

/// The origin of a load request.
///
/// Every resolution carries the caller explicitly rather than inferring it
/// from whichever container happens to be loading; this keeps resolution a
/// pure function of its inputs and lets independent loader instances coexist.
#[derive( Clone, Debug, Eq, Hash, PartialEq )]
pub enum Caller {
    /// The request comes from the host application itself.
    Host,
    /// The request comes from an already-loading or loaded module,
    /// typically a container pulling in one of its secondary chunks.
    Module( ModuleId ),
}

impl Caller {
    /// The requesting module's identifier, if the caller is a module.
    #[inline] pub fn module_id( &self ) -> Option<&ModuleId> {
        match self {
            Caller::Host => None,
            Caller::Module( id ) => Some( id ),
        }
    }
}
