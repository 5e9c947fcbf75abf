// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Index aliases.

use super::{positional, Command, FtCommand};
use crate::client::Client;
use crate::error::Result;
use crate::response::{expect_ok, Reply};

macro_rules! alias_command {
    ($(#[$doc:meta])* $name:ident, $id:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name {
            command: Command,
        }

        impl $name {
            pub fn new(alias: impl Into<String>, index: impl Into<String>) -> Self {
                let command = Command::new($id)
                    .option("alias", positional(alias.into()))
                    .option("index", positional(index.into()))
                    .require(&["alias", "index"]);
                Self { command }
            }
        }

        impl FtCommand for $name {
            type Output = ();

            fn command(&self) -> &Command {
                &self.command
            }

            fn parse_response(&self, reply: Reply, _client: Option<&Client>) -> Result<()> {
                expect_ok(reply, $id)
            }
        }
    };
}

alias_command!(
    /// `FT.ALIASADD alias index`
    AliasAdd,
    "FT.ALIASADD"
);

alias_command!(
    /// `FT.ALIASUPDATE alias index`, moving the alias if it exists.
    AliasUpdate,
    "FT.ALIASUPDATE"
);

/// `FT.ALIASDEL alias`
#[derive(Debug, Clone)]
pub struct AliasDelete {
    command: Command,
}

impl AliasDelete {
    pub fn new(alias: impl Into<String>) -> Self {
        let command = Command::new("FT.ALIASDEL")
            .option("alias", positional(alias.into()))
            .require(&["alias"]);
        Self { command }
    }
}

impl FtCommand for AliasDelete {
    type Output = ();

    fn command(&self) -> &Command {
        &self.command
    }

    fn parse_response(&self, reply: Reply, _client: Option<&Client>) -> Result<()> {
        expect_ok(reply, "FT.ALIASDEL")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::strings;

    #[test]
    fn test_alias_arguments() {
        let add = AliasAdd::new("products", "products-v2");
        assert_eq!(strings(&add.arguments().unwrap()), vec!["products", "products-v2"]);
        assert_eq!(AliasUpdate::new("a", "b").id(), "FT.ALIASUPDATE");
        assert_eq!(strings(&AliasDelete::new("a").arguments().unwrap()), vec!["a"]);
        assert!(AliasAdd::new("a", "").arguments().is_err());
    }

    #[test]
    fn test_alias_reply() {
        let add = AliasAdd::new("a", "b");
        assert!(add.parse_response(Reply::Status("OK".into()), None).is_ok());
        assert!(add.parse_response(Reply::Int(0), None).is_err());
    }
}
