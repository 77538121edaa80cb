// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for CRUD operations on storage entities.

pub mod clients;
pub mod companies;
pub mod interactions;
pub mod stats;
pub mod suggestions;
