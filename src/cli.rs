// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::module::ModuleKind;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Collect the rack unit and blade inventory.
    GetInventory(ModuleArgs),
    /// Set the power state of the service profile bound to a node.
    PowerSet(ModuleArgs),
}

impl Commands {
    pub fn module(&self) -> (ModuleKind, &ModuleArgs) {
        match self {
            Self::GetInventory(args) => (ModuleKind::GetInventory, args),
            Self::PowerSet(args) => (ModuleKind::PowerSet, args),
        }
    }
}

#[derive(Parser, Clone, Debug)]
#[command(author, version, about, long_about = None)]
pub struct ModuleArgs {
    /// JSON file with the module arguments, as written by Ansible.
    pub args_file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subcommands() {
        let cli = Cli::try_parse_from(["ucs-ansible", "power-set", "/tmp/args"]).unwrap();
        let (kind, args) = cli.command.module();
        assert_eq!(kind, ModuleKind::PowerSet);
        assert_eq!(args.args_file, PathBuf::from("/tmp/args"));

        let cli = Cli::try_parse_from(["ucs-ansible", "get-inventory", "a.json"]).unwrap();
        assert_eq!(cli.command.module().0, ModuleKind::GetInventory);
    }

    #[test]
    fn test_args_file_required() {
        assert!(Cli::try_parse_from(["ucs-ansible", "get-inventory"]).is_err());
        assert!(ModuleArgs::try_parse_from(["cisco_ucs_power_set"]).is_err());
    }
}
