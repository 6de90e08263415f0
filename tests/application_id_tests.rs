// Application identity: normalization and wire form

use correlator::model::{ApplicationId, ApplicationKind, IdError, normalize};

#[test]
fn replicaset_hash_suffix_collapses_into_deployment() {
    let id = normalize("prod", "ReplicaSet", "web-7f9c8d6b5");
    assert_eq!(id.namespace, "prod");
    assert_eq!(id.kind, ApplicationKind::Deployment);
    assert_eq!(id.name, "web");
}

#[test]
fn pod_template_hash_with_non_hex_letters_collapses() {
    for name in ["web-5d8f7c9bxk", "checkout-api-6b7ccf8x9z", "worker-b9w4t"] {
        let id = normalize("prod", "ReplicaSet", name);
        assert_eq!(id.kind, ApplicationKind::Deployment, "{name}");
        assert_eq!(Some(id.name.as_str()), name.rsplit_once('-').map(|(owner, _)| owner));
    }
}

#[test]
fn other_kind_with_a_known_name_round_trips() {
    let id = ApplicationId::new("prod", ApplicationKind::Other("Deployment".into()), "web");
    assert_eq!(id.kind, ApplicationKind::Deployment);
    let parsed: ApplicationId = id.to_string().parse().unwrap();
    assert_eq!(parsed, id);

    let rs = ApplicationId::new("prod", ApplicationKind::Other("ReplicaSet".into()), "web-5d8f7c9bxk");
    assert_eq!(rs, normalize("prod", "Deployment", "web"));
}

#[test]
fn job_timestamp_suffix_collapses_into_cronjob() {
    let id = normalize("ops", "Job", "nightly-backup-28192740");
    assert_eq!(id.kind, ApplicationKind::CronJob);
    assert_eq!(id.name, "nightly-backup");
}

#[test]
fn non_matching_suffixes_pass_through() {
    let rs = normalize("prod", "ReplicaSet", "web-proxy");
    assert_eq!(rs.kind, ApplicationKind::ReplicaSet);
    assert_eq!(rs.name, "web-proxy");

    let job = normalize("ops", "Job", "migrate-v2");
    assert_eq!(job.kind, ApplicationKind::Job);
    assert_eq!(job.name, "migrate-v2");

    // single segment: nothing to collapse into
    let bare = normalize("prod", "ReplicaSet", "abc123");
    assert_eq!(bare.kind, ApplicationKind::ReplicaSet);
    assert_eq!(bare.name, "abc123");
}

#[test]
fn empty_namespace_and_kind_get_placeholders() {
    let id = normalize("", "", "standalone");
    assert_eq!(id.namespace, "_");
    assert_eq!(id.kind, ApplicationKind::Pod);

    let none = normalize("default", "<none>", "standalone");
    assert_eq!(none.kind, ApplicationKind::Pod);
}

#[test]
fn unknown_kinds_pass_through() {
    let id = normalize("prod", "Rollout", "web");
    assert_eq!(id.kind, ApplicationKind::Other("Rollout".into()));
    assert_eq!(id.to_string(), "prod:Rollout:web");
}

#[test]
fn normalization_is_idempotent() {
    for (ns, kind, name) in [
        ("prod", "ReplicaSet", "web-7f9c8d6b5"),
        ("ops", "Job", "backup-28192740"),
        ("", "", "pod-1"),
        ("prod", "StatefulSet", "db-0"),
        ("prod", "ReplicaSet", "api-5d4f-8c7b"),
    ] {
        let once = normalize(ns, kind, name);
        let twice = normalize(&once.namespace, once.kind.as_str(), &once.name);
        assert_eq!(once, twice, "{ns}:{kind}:{name}");
    }
}

#[test]
fn wire_form_round_trips() {
    let ids = [
        normalize("prod", "ReplicaSet", "web-7f9c8d6b5"),
        ApplicationId::new("", ApplicationKind::Rds, "orders-db"),
        normalize("kube-system", "DaemonSet", "node-exporter"),
    ];
    for id in ids {
        let parsed: ApplicationId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }
    assert_eq!(
        ApplicationId::new("", ApplicationKind::Rds, "orders-db").to_string(),
        "_:RDS:orders-db"
    );
}

#[test]
fn parse_requires_exactly_three_fields() {
    let err = "prod:Deployment".parse::<ApplicationId>().unwrap_err();
    assert_eq!(err, IdError::Format("prod:Deployment".into()));
    assert!("prod:Deployment:web:extra".parse::<ApplicationId>().is_err());
    assert!("".parse::<ApplicationId>().is_err());
}

#[test]
fn serializes_as_wire_string() {
    let id = normalize("prod", "Deployment", "web");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"prod:Deployment:web\"");
    let back: ApplicationId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}
