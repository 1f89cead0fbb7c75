//! Service declarations.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use schemata_foundation::TypeName;

use crate::options::{OptionValue, Options};

/// A remote procedure on a service.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rpc {
    /// Method name.
    pub name: String,
    /// Request message type.
    pub request: TypeName,
    /// Response message type.
    pub response: TypeName,
    /// Whether the client streams requests.
    pub request_streaming: bool,
    /// Whether the server streams responses.
    pub response_streaming: bool,
    /// Method options.
    pub options: Options,
}

impl Rpc {
    /// Creates a unary method.
    #[must_use]
    pub fn new(name: impl Into<String>, request: TypeName, response: TypeName) -> Self {
        Self {
            name: name.into(),
            request,
            response,
            request_streaming: false,
            response_streaming: false,
            options: Options::new(),
        }
    }

    /// Sets the streaming flags.
    #[must_use]
    pub fn with_streaming(mut self, request: bool, response: bool) -> Self {
        self.request_streaming = request;
        self.response_streaming = response;
        self
    }

    /// Adds an option.
    #[must_use]
    pub fn with_option(mut self, key: &str, value: impl Into<OptionValue>) -> Self {
        self.options.insert(key, value);
        self
    }
}

/// A service declaration. Services are declared types whose members are rpcs.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Service {
    /// Qualified name.
    pub name: TypeName,
    /// Methods in declaration order.
    pub rpcs: Vec<Rpc>,
    /// Service options.
    pub options: Options,
}

impl Service {
    /// Creates a service with no methods.
    #[must_use]
    pub fn new(name: TypeName) -> Self {
        Self {
            name,
            rpcs: Vec::new(),
            options: Options::new(),
        }
    }

    /// Adds a method.
    #[must_use]
    pub fn with_rpc(mut self, rpc: Rpc) -> Self {
        self.rpcs.push(rpc);
        self
    }

    /// Adds an option.
    #[must_use]
    pub fn with_option(mut self, key: &str, value: impl Into<OptionValue>) -> Self {
        self.options.insert(key, value);
        self
    }

    /// Finds a method by name.
    #[must_use]
    pub fn rpc(&self, name: &str) -> Option<&Rpc> {
        self.rpcs.iter().find(|r| r.name == name)
    }
}
