use crate::config::{expand_home, AnsibleDefaults};
use crate::inventory::Host;
use std::path::PathBuf;

const USER_KEYS: &[&str] = &["ansible_user", "ansible_ssh_user"];
const PORT_KEYS: &[&str] = &["ansible_port", "ansible_ssh_port"];
const KEY_FILE_KEYS: &[&str] = &["ansible_ssh_private_key_file", "ansible_private_key_file"];
const ADDRESS_KEYS: &[&str] = &["ansible_host"];

/// Resolved connection settings for one host.
///
/// `None` fields are left to the transport's own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionProfile {
    pub user: Option<String>,
    pub private_key: Option<PathBuf>,
    pub port: Option<u16>,
    /// Address to connect to when it differs from the inventory name.
    pub address: Option<String>,
}

impl ConnectionProfile {
    /// Fills fields still unset from the ansible.cfg `[defaults]` section.
    pub fn with_fallbacks(mut self, ansible: &AnsibleDefaults) -> ConnectionProfile {
        if self.user.is_none() {
            self.user = ansible.remote_user.clone();
        }
        if self.private_key.is_none() {
            self.private_key = ansible.private_key_file.clone();
        }
        self
    }

    /// Merges per-host inline variables over this default profile.
    pub fn resolve_for(&self, host: &Host) -> ConnectionProfile {
        let mut profile = self.clone();

        if let Some(user) = lookup(host, USER_KEYS) {
            profile.user = Some(user.to_string());
        }

        if let Some(raw) = lookup(host, PORT_KEYS) {
            match raw.parse::<u16>() {
                Ok(port) => profile.port = Some(port),
                Err(_) => tracing::warn!(host = %host.name, port = raw, "ignoring invalid port override"),
            }
        }

        if let Some(key) = lookup(host, KEY_FILE_KEYS) {
            profile.private_key = Some(expand_home(key));
        }

        if let Some(address) = lookup(host, ADDRESS_KEYS) {
            profile.address = Some(address.to_string());
        }

        profile
    }

    /// `user@address` or just the address.
    pub fn target(&self, host: &Host) -> String {
        let address = self.address.as_deref().unwrap_or(&host.name);
        match &self.user {
            Some(user) => format!("{}@{}", user, address),
            None => address.to_string(),
        }
    }
}

fn lookup<'a>(host: &'a Host, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|k| host.vars.get(*k))
        .map(String::as_str)
        .filter(|v| !v.is_empty())
}
