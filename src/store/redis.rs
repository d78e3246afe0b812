//! RedisStore - `PrimaryStore` over a Redis server.
//!
//! One connection is opened lazily and reused. Any I/O failure drops it so
//! the next call reconnects; there is no retry within a call.

use std::sync::Mutex;
use std::time::Duration;

use redis::{Client, Connection, RedisError};
use tracing::debug;

use super::{PrimaryStore, StoreError, MAX_TTL};

const DEFAULT_TIMEOUT: Duration = Duration::from_millis(250);

pub struct RedisStore {
    client: Client,
    connection: Mutex<Option<Connection>>,
    timeout: Duration,
}

impl RedisStore {
    /// Create a store for `url` (e.g. `redis://127.0.0.1:6379`).
    ///
    /// Only the URL is validated here; the connection is opened on first use.
    pub fn open(url: &str) -> Result<Self, StoreError> {
        let client = Client::open(url).map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(Self {
            client,
            connection: Mutex::new(None),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Connect, read and write timeout applied to every call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        let connection = self
            .client
            .get_connection_with_timeout(self.timeout)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        connection
            .set_read_timeout(Some(self.timeout))
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        connection
            .set_write_timeout(Some(self.timeout))
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        debug!("connected to redis");
        Ok(connection)
    }

    fn with_connection<T>(
        &self,
        operation: &'static str,
        key: &str,
        f: impl FnOnce(&mut Connection) -> Result<T, RedisError>,
    ) -> Result<T, StoreError> {
        let mut slot = self
            .connection
            .lock()
            .map_err(|_| StoreError::LockPoisoned(operation))?;

        if slot.is_none() {
            *slot = Some(self.connect()?);
        }
        let Some(connection) = slot.as_mut() else {
            return Err(StoreError::Unavailable("no connection".into()));
        };

        f(connection).map_err(|err| {
            if err.code() == Some("WRONGTYPE") {
                return StoreError::WrongType {
                    key: key.to_string(),
                };
            }
            if err.is_io_error() || err.is_connection_dropped() || err.is_timeout() {
                *slot = None;
                return StoreError::Unavailable(err.to_string());
            }
            StoreError::Backend(err.to_string())
        })
    }
}

impl PrimaryStore for RedisStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.with_connection("get", key, |con| {
            redis::cmd("GET").arg(key).query::<Option<String>>(con)
        })
    }

    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError> {
        self.with_connection("set", key, |con| {
            let mut cmd = redis::cmd("SET");
            cmd.arg(key).arg(value);
            if let Some(ttl) = ttl {
                cmd.arg("EX").arg(ttl.min(MAX_TTL).as_secs().max(1));
            }
            cmd.query::<()>(con)
        })
    }

    fn set_add(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        self.with_connection("set_add", key, |con| {
            redis::cmd("SADD")
                .arg(key)
                .arg(member)
                .query::<i64>(con)
                .map(|added| added > 0)
        })
    }

    fn set_remove(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        self.with_connection("set_remove", key, |con| {
            redis::cmd("SREM")
                .arg(key)
                .arg(member)
                .query::<i64>(con)
                .map(|removed| removed > 0)
        })
    }

    fn set_members(&self, key: &str) -> Result<Vec<String>, StoreError> {
        self.with_connection("set_members", key, |con| {
            let mut members = redis::cmd("SMEMBERS").arg(key).query::<Vec<String>>(con)?;
            members.sort();
            Ok(members)
        })
    }

    fn ping(&self) -> Result<(), StoreError> {
        self.with_connection("ping", "", |con| redis::cmd("PING").query::<String>(con).map(|_| ()))
    }
}
