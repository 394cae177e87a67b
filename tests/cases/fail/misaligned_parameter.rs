// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#[query_derive::repository(entity = User)]
pub trait UserRepository {
    async fn find_by_email(&self, mail: String) -> Result<Option<User>, Error>;
}

fn main() {}
