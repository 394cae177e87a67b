// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#[query_derive::repository(entity = User)]
pub trait UserRepository {
    async fn lookup_by_email(&self, email: String) -> Result<Option<User>, Error>;
}

fn main() {}
