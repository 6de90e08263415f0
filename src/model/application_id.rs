// Application identity: (namespace, kind, name), always kept in normalized form.
// Wire form is "namespace:kind:name".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IdError {
    #[error("invalid application id {0:?}: should be ns:kind:name")]
    Format(String),
}

/// Workload kind. Unknown orchestrator kinds pass through as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ApplicationKind {
    Deployment,
    StatefulSet,
    DaemonSet,
    ReplicaSet,
    CronJob,
    Job,
    Pod,
    Rds,
    Other(String),
}

impl ApplicationKind {
    /// Parse a raw kind label. Empty and `<none>` mean a bare pod.
    pub fn from_raw(s: &str) -> Self {
        match s {
            "" | "<none>" | "Pod" => ApplicationKind::Pod,
            "Deployment" => ApplicationKind::Deployment,
            "StatefulSet" => ApplicationKind::StatefulSet,
            "DaemonSet" => ApplicationKind::DaemonSet,
            "ReplicaSet" => ApplicationKind::ReplicaSet,
            "CronJob" => ApplicationKind::CronJob,
            "Job" => ApplicationKind::Job,
            "RDS" => ApplicationKind::Rds,
            other => ApplicationKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ApplicationKind::Deployment => "Deployment",
            ApplicationKind::StatefulSet => "StatefulSet",
            ApplicationKind::DaemonSet => "DaemonSet",
            ApplicationKind::ReplicaSet => "ReplicaSet",
            ApplicationKind::CronJob => "CronJob",
            ApplicationKind::Job => "Job",
            ApplicationKind::Pod => "Pod",
            ApplicationKind::Rds => "RDS",
            ApplicationKind::Other(s) => s,
        }
    }
}

impl fmt::Display for ApplicationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApplicationId {
    pub namespace: String,
    pub kind: ApplicationKind,
    pub name: String,
}

impl ApplicationId {
    /// Builds a normalized id. Orchestrator-generated suffixes are collapsed:
    /// ReplicaSet `web-7f9c8d6b5` becomes Deployment `web`, Job `backup-28192740` becomes
    /// CronJob `backup`. These are pattern heuristics; a workload whose own last name segment
    /// contains a hex digit (ReplicaSet) or is numeric (Job) is collapsed too.
    pub fn new(namespace: &str, kind: ApplicationKind, name: &str) -> Self {
        // raw kind strings resolve to their named variant
        let kind = match kind {
            ApplicationKind::Other(s) => ApplicationKind::from_raw(&s),
            kind => kind,
        };
        let (kind, name) = match kind {
            ApplicationKind::ReplicaSet => match split_suffix(name) {
                Some((owner, suffix)) if has_hex_digit(suffix) => {
                    (ApplicationKind::Deployment, owner)
                }
                _ => (ApplicationKind::ReplicaSet, name),
            },
            ApplicationKind::Job => match split_suffix(name) {
                Some((owner, suffix)) if suffix.parse::<u64>().is_ok() => {
                    (ApplicationKind::CronJob, owner)
                }
                _ => (ApplicationKind::Job, name),
            },
            kind => (kind, name),
        };
        let namespace = if namespace.is_empty() { "_" } else { namespace };
        Self {
            namespace: namespace.to_string(),
            kind,
            name: name.to_string(),
        }
    }
}

/// Normalizes a raw (namespace, kind, name) triple as found in metric labels.
pub fn normalize(namespace: &str, raw_kind: &str, raw_name: &str) -> ApplicationId {
    ApplicationId::new(namespace, ApplicationKind::from_raw(raw_kind), raw_name)
}

fn split_suffix(name: &str) -> Option<(&str, &str)> {
    name.rsplit_once('-').filter(|(owner, _)| !owner.is_empty())
}

/// Pod-template hashes use a consonant-heavy alphabet, so a single hex digit anywhere is enough.
fn has_hex_digit(s: &str) -> bool {
    s.bytes().any(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.namespace, self.kind, self.name)
    }
}

impl FromStr for ApplicationId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [ns, kind, name] = parts.as_slice() else {
            return Err(IdError::Format(s.to_string()));
        };
        Ok(normalize(ns, kind, name))
    }
}

impl Serialize for ApplicationId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ApplicationId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
