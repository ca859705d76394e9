// SPDX-FileCopyrightText: © 2025 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

pub mod config;
pub mod gate;
pub mod generators;
pub mod interaction;
pub mod mapping;
pub mod mapping_state;
pub mod output;
pub mod policy;
pub mod simulation;
pub mod topology;
pub mod user_config;
pub mod utils;
