//! Admin command trait for deployment communication
//!
//! This trait abstracts the administrative command channel used for
//! topology discovery. Establishing the underlying connection is the
//! implementor's concern; this crate only issues commands through it.
//!
//! Implementations:
//! - `SnapshotAdmin`: answers from a captured reply document on disk
//! - Callers may wrap a live driver handle

use std::io;

use serde_json::{json, Value};

/// Database administrative commands are issued against
pub const ADMIN_DB: &str = "admin";

/// Administrative command channel
pub trait AdminCommand {
    /// Run a command document against `database` and return the raw reply
    ///
    /// # Example
    /// ```ignore
    /// let reply = admin.run_command("admin", &json!({ "listShards": 1 }))?;
    /// ```
    fn run_command(&mut self, database: &str, command: &Value) -> io::Result<Value>;
}

impl<A: AdminCommand + ?Sized> AdminCommand for &mut A {
    fn run_command(&mut self, database: &str, command: &Value) -> io::Result<Value> {
        (**self).run_command(database, command)
    }
}

impl<A: AdminCommand + ?Sized> AdminCommand for Box<A> {
    fn run_command(&mut self, database: &str, command: &Value) -> io::Result<Value> {
        (**self).run_command(database, command)
    }
}

/// Extension trait with the commands this crate needs
pub trait AdminCommandExt: AdminCommand {
    /// Run `listShards` against the admin database
    fn list_shards(&mut self) -> io::Result<Value> {
        self.run_command(ADMIN_DB, &json!({ "listShards": 1 }))
    }

    /// Send `ping` and check the reply's `ok` field
    fn ping(&mut self) -> io::Result<bool> {
        let reply = self.run_command(ADMIN_DB, &json!({ "ping": 1 }))?;
        Ok(reply_ok(&reply).unwrap_or(false))
    }
}

impl<T: AdminCommand + ?Sized> AdminCommandExt for T {}

/// Name of a command document (its first key)
pub fn command_name(command: &Value) -> Option<&str> {
    command.as_object()?.keys().next().map(String::as_str)
}

/// Interpret the `ok` field of a reply; `None` when absent
pub fn reply_ok(reply: &Value) -> Option<bool> {
    let ok = reply.get("ok")?;
    match ok {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|v| v == 1.0),
        _ => Some(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl AdminCommand for Echo {
        fn run_command(&mut self, database: &str, command: &Value) -> io::Result<Value> {
            Ok(json!({ "ok": 1, "db": database, "cmd": command_name(command) }))
        }
    }

    #[test]
    fn test_list_shards_targets_admin() {
        let mut admin = Echo;
        let reply = admin.list_shards().unwrap();
        assert_eq!(reply["db"], "admin");
        assert_eq!(reply["cmd"], "listShards");
    }

    #[test]
    fn test_ping() {
        let mut admin = Echo;
        assert!(admin.ping().unwrap());
    }

    #[test]
    fn test_reply_ok_variants() {
        assert_eq!(reply_ok(&json!({ "ok": 1 })), Some(true));
        assert_eq!(reply_ok(&json!({ "ok": 1.0 })), Some(true));
        assert_eq!(reply_ok(&json!({ "ok": 0 })), Some(false));
        assert_eq!(reply_ok(&json!({ "ok": true })), Some(true));
        assert_eq!(reply_ok(&json!({ "shards": [] })), None);
    }
}
