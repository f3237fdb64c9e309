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

use clap::Parser;
use ucs_ansible::cli::ModuleArgs;
use ucs_ansible::common::logging::init_logging;
use ucs_ansible::module::ModuleKind;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = ModuleArgs::parse();
    init_logging();

    let result = ModuleKind::GetInventory.run_file(&args.args_file).await;
    result.emit();
    std::process::exit(result.exit_code());
}
