// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#[query_derive::repository(entity = User)]
pub trait UserRepository {
    #[skip]
    async fn ping(&self) -> Result<bool, Error>;
}

fn main() {}
