// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#[derive(query_derive::Entity)]
#[entity(table = "items")]
pub struct Item(i64, String);

fn main() {}
