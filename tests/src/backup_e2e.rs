//! End-to-end fleet backup over replay captures: topology document in,
//! snapshot files out, with sessions answered from capture files exactly
//! the way the CLI's replay mode runs.

use std::fs;
use std::path::PathBuf;

use paramvault_common::config::Config;
use paramvault_common::model::topology::parse_topology;
use paramvault_core::backup::{BackupService, Outcome};
use paramvault_core::replay::ReplayDirectory;
use paramvault_protocols::identity::build::encode_identity;
use paramvault_protocols::record::build::RecordBuilder;
use paramvault_protocols::{
    ATTR_DATA_TYPE, ATTR_VALUE, DPI_PARAMETER_CLASS, IDENTITY_CLASS, PARAMETER_CLASS,
};

const WRITABLE: u32 = 1 << 8;

const TOPOLOGY: &str = r#"[
    {
        "Name": "Line1_PF755",
        "CatalogNumber": "20G1ANC060JA0NNNNN",
        "Vendor": 1,
        "ProductType": 143,
        "ProductCode": 2100,
        "ParentModule": "Local",
        "ParentModPortId": 2,
        "Inhibited": false,
        "Address": "10.0.0.5"
    },
    {
        "Name": "Line1_PF525",
        "CatalogNumber": "25B-D010N104",
        "Vendor": 1,
        "ProductType": 150,
        "ProductCode": 11,
        "ParentModule": "Line1_PF755",
        "ParentModPortId": 1,
        "Inhibited": false,
        "Address": "10.0.0.6"
    },
    {
        "Name": "Line1_Spare",
        "ProductType": 150,
        "ProductCode": 11,
        "ParentModule": "Local",
        "ParentModPortId": 3,
        "Inhibited": true,
        "Address": "10.0.0.7"
    }
]"#;

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

struct Exchange {
    class: u16,
    instance: u16,
    attribute: Option<u8>,
    response: Vec<u8>,
}

fn capture_json(route: &str, exchanges: &[Exchange]) -> String {
    let list: Vec<String> = exchanges
        .iter()
        .map(|e| {
            let attribute = match e.attribute {
                Some(a) => a.to_string(),
                None => "null".to_string(),
            };
            format!(
                r#"{{"class": {}, "instance": {}, "attribute": {}, "response": "{}"}}"#,
                e.class,
                e.instance,
                attribute,
                to_hex(&e.response)
            )
        })
        .collect();
    format!(
        r#"{{"route": "{route}", "exchanges": [{}]}}"#,
        list.join(", ")
    )
}

fn pf755_exchanges() -> Vec<Exchange> {
    vec![
        Exchange {
            class: IDENTITY_CLASS,
            instance: 1,
            attribute: None,
            response: encode_identity(1, 143, 2100, (14, 2), 0xA001, "PowerFlex 755"),
        },
        // Host chain: two records, second folds back.
        Exchange {
            class: DPI_PARAMETER_CLASS,
            instance: 1,
            attribute: None,
            response: RecordBuilder::new()
                .descriptor(0b011 | WRITABLE)
                .value([0x14, 0x00, 0, 0])
                .default([0x0A, 0x00, 0, 0])
                .links(2, 0)
                .units("Secs")
                .name("Accel Time 1")
                .build(),
        },
        Exchange {
            class: DPI_PARAMETER_CLASS,
            instance: 2,
            attribute: None,
            response: RecordBuilder::new()
                .descriptor(0b011 | WRITABLE)
                .value([0x3C, 0x00, 0, 0])
                .default([0x3C, 0x00, 0, 0]) // at default: filtered out
                .links(1, 1)
                .units("Hz")
                .name("Maximum Freq")
                .build(),
        },
        // Slot 1 peripheral, one chain record at 0x4401.
        Exchange {
            class: IDENTITY_CLASS,
            instance: 2,
            attribute: None,
            response: encode_identity(1, 143, 7, (2, 1), 0xA002, "20-750-ENETR"),
        },
        Exchange {
            class: DPI_PARAMETER_CLASS,
            instance: 0x4401,
            attribute: None,
            response: RecordBuilder::new()
                .descriptor(0b011 | WRITABLE)
                .value([0x07, 0x00, 0, 0])
                .default([0x00, 0x00, 0, 0])
                .links(0x4400, 0x4400)
                .name("Port Rate")
                .build(),
        },
    ]
}

fn pf525_exchanges() -> Vec<Exchange> {
    vec![
        Exchange {
            class: IDENTITY_CLASS,
            instance: 1,
            attribute: None,
            response: encode_identity(1, 150, 11, (7, 1), 0xB001, "PowerFlex 525"),
        },
        Exchange {
            class: PARAMETER_CLASS,
            instance: 41,
            attribute: Some(ATTR_DATA_TYPE),
            response: vec![0x03], // signed 16-bit in the compact dialect
        },
        Exchange {
            class: PARAMETER_CLASS,
            instance: 41,
            attribute: Some(ATTR_VALUE),
            response: vec![0xC8, 0x00],
        },
        Exchange {
            class: PARAMETER_CLASS,
            instance: 44,
            attribute: Some(ATTR_DATA_TYPE),
            response: vec![0x03],
        },
        Exchange {
            class: PARAMETER_CLASS,
            instance: 44,
            attribute: Some(ATTR_VALUE),
            response: vec![0x3C, 0x00], // 60, equals the default: filtered out
        },
    ]
}

struct TestDirs {
    captures: PathBuf,
    out: PathBuf,
}

fn setup(tag: &str) -> TestDirs {
    let base = std::env::temp_dir().join(format!("paramvault-e2e-{tag}-{}", std::process::id()));
    let captures = base.join("captures");
    let out = base.join("out");
    fs::create_dir_all(&captures).unwrap();

    fs::write(
        captures.join("pf755.json"),
        capture_json("2,10.0.0.5", &pf755_exchanges()),
    )
    .unwrap();
    fs::write(
        captures.join("pf525.json"),
        capture_json("2,10.0.0.5,1,10.0.0.6", &pf525_exchanges()),
    )
    .unwrap();

    TestDirs { captures, out }
}

fn teardown(dirs: &TestDirs) {
    let _ = fs::remove_dir_all(dirs.captures.parent().unwrap());
}

async fn run_backup(dirs: &TestDirs) -> Vec<paramvault_core::backup::ModuleOutcome> {
    let records = parse_topology(TOPOLOGY).unwrap();
    let factory = ReplayDirectory::load(&dirs.captures).unwrap();
    let cfg = Config {
        output_dir: dirs.out.clone(),
        ..Config::default()
    };
    BackupService::new(Box::new(factory), cfg)
        .run(&records)
        .await
        .unwrap()
}

#[tokio::test]
async fn fleet_backup_writes_one_snapshot_per_catalog() {
    let dirs = setup("fleet");
    let outcomes = run_backup(&dirs).await;

    assert_eq!(outcomes.len(), 3);

    // The 755 yields its host catalog plus the slot-1 peripheral.
    let Outcome::BackedUp { files } = &outcomes[0].outcome else {
        panic!("755 should back up, got {:?}", outcomes[0].outcome);
    };
    assert_eq!(files.len(), 2);

    let host: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&dirs.out.join("Line1_PF755.json")).unwrap())
            .unwrap();
    assert_eq!(host["identity"]["product_name"], "PowerFlex 755");
    assert_eq!(host["complete"], true);
    // Accel Time kept (20 != 10), Maximum Freq filtered (at default).
    let params = host["parameters"].as_array().unwrap();
    assert_eq!(params.len(), 1);
    assert_eq!(params[0]["name"], "Accel Time 1");
    assert_eq!(params[0]["value"], "20");

    let port: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(&dirs.out.join("Line1_PF755_port1.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(port["identity"]["product_name"], "20-750-ENETR");
    assert_eq!(port["port"], 1);
    assert_eq!(port["parameters"][0]["name"], "Port Rate");

    // The bridged 525 walks through the two-hop route.
    let Outcome::BackedUp { files } = &outcomes[1].outcome else {
        panic!("525 should back up, got {:?}", outcomes[1].outcome);
    };
    assert_eq!(files.len(), 1);
    let drive: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&dirs.out.join("Line1_PF525.json")).unwrap())
            .unwrap();
    let params = drive["parameters"].as_array().unwrap();
    assert_eq!(params.len(), 1);
    assert_eq!(params[0]["number"], 41);

    // The inhibited spare is skipped with its reason, not failed.
    assert!(
        matches!(&outcomes[2].outcome, Outcome::Skipped { reason } if reason == "Inhibited")
    );

    teardown(&dirs);
}

#[tokio::test]
async fn backup_output_is_byte_stable_across_runs() {
    let dirs = setup("stable");
    run_backup(&dirs).await;
    let first = fs::read_to_string(dirs.out.join("Line1_PF755.json")).unwrap();

    run_backup(&dirs).await;
    let second = fs::read_to_string(dirs.out.join("Line1_PF755.json")).unwrap();

    assert_eq!(first, second);
    teardown(&dirs);
}
