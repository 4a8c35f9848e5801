use std::sync::LazyLock;

use crate::storage::DB_TABLE_PREFIX;

pub(crate) static DB_TABLE_MICROPOSTS: LazyLock<String> =
    LazyLock::new(|| format!("{}{}", *DB_TABLE_PREFIX, "microposts"));
