// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Library-level emission of builder-made programs with store-backed settings.

use lfts_config::{ConfigService, GeneratorConfig, GENERATOR_CONFIG_KEY};
use lfts_dry_tests::{ms, InMemoryConfigStore, ProgramBuilder, ReactorBuilder};
use lfts_gen::{emit_program, EmitOptions};

fn options_from(store: InMemoryConfigStore) -> EmitOptions {
    let config = GeneratorConfig::load(&ConfigService::new(store)).unwrap();
    EmitOptions::from_config(&config)
}

fn pipeline() -> ProgramBuilder {
    ProgramBuilder::new()
        .reactor(
            ReactorBuilder::new("Buffer")
                .type_param("T")
                .param("size", "number", &["1"])
                .input("inp", "T")
                .output("out", "T")
                .build(),
        )
        .reactor(
            ReactorBuilder::new("Pipeline")
                .main()
                .preamble("import { readFileSync } from \"fs\";")
                .generic_instance("a", "Buffer", &["number"], &[("size", "4")])
                .instance("b", "Buffer", &[])
                .timer("t", Some(ms(10)), None)
                .state("seen", "number", &["0"])
                .action("retry", "")
                .physical_action("ext", "number", Some(ms(5)))
                .connect(&["a.out"], &["b.inp"])
                .reaction(&["t"], &["seen"], &["retry"], "retry.schedule(0, null);")
                .reaction(&["shutdown"], &[], &[], "console.log(\"bye\");")
                .build(),
        )
}

#[test]
fn builder_program_covers_every_declaration_kind() {
    let out = emit_program(&pipeline().build(), &EmitOptions::default()).unwrap();
    let text = &out.value;

    assert!(text.contains("// *********** From the preamble, verbatim:\nimport { readFileSync } from \"fs\";\n"));
    assert!(text.contains("    a: Buffer<number>;\n"));
    assert!(text.contains("this.a = new Buffer<number>(this, 4);"));
    assert!(text.contains("this.b = new Buffer(this, undefined);"));
    assert!(text.contains("this.t = new __Timer(this, TimeValue.msec(10), TimeValue.secs(0));"));
    assert!(text.contains("this.seen = new __State(0);"));
    assert!(text.contains("this.retry = new __Action<Present>(this, __Origin.logical);"));
    assert!(text.contains("this.ext = new __Action<number>(this, __Origin.physical, TimeValue.msec(5));"));
    assert!(text.contains("this._connect(this.a.out, this.b.inp);"));
    assert!(text.contains("new __Args(this.t, this.seen, this.schedulable(this.retry)),"));
    assert!(text.contains("new __Triggers(this.shutdown),\n"));
    assert!(text.contains("new __Args(),\n"));
    assert!(text.contains("__app = new Pipeline(__timeout, __keepAlive, __fast);"));
}

#[test]
fn stored_settings_drive_indentation() {
    let store = InMemoryConfigStore::with_generator_config(&GeneratorConfig {
        indent_width: 2,
        ..GeneratorConfig::default()
    });
    let options = options_from(store.clone());
    assert_eq!(store.load_count(), 1);

    let out = emit_program(&pipeline().build(), &options).unwrap();
    assert!(out.value.contains("\n  size: __Parameter<number>;\n"));
}

#[test]
fn stored_rti_settings_override_the_program() {
    let store = InMemoryConfigStore::with_raw(
        GENERATOR_CONFIG_KEY,
        r#"{ "rti_host": "rti.internal", "rti_port": 15100 }"#,
    );
    let program = ProgramBuilder::new()
        .reactor(
            ReactorBuilder::new("Federation")
                .federated()
                .physical_action("net0", "string", None)
                .named_reaction("fromNet0", "net0")
                .build(),
        )
        .rti("rti.example.org", 7000)
        .federate(3, &["net0"], &[])
        .build();

    let from_ir = emit_program(
        &program,
        &EmitOptions {
            federate: Some(3),
            ..EmitOptions::default()
        },
    )
    .unwrap();
    assert!(from_ir.value.contains("super(3, 7000, \"rti.example.org\", timeout"));

    let from_store = emit_program(
        &program,
        &EmitOptions {
            federate: Some(3),
            ..options_from(store)
        },
    )
    .unwrap();
    assert!(from_store.value.contains("super(3, 15100, \"rti.internal\", timeout"));
    assert!(from_store.value.contains("this.registerFederatePortAction(0, this.net0);"));
    assert!(from_store.value.contains("__app = new Federation(__timeout, __keepAlive, __fast);"));
}

#[test]
fn blank_stored_rti_host_is_rejected() {
    let store = InMemoryConfigStore::with_raw(GENERATOR_CONFIG_KEY, r#"{ "rti_host": " " }"#);
    let err = GeneratorConfig::load(&ConfigService::new(store)).unwrap_err();
    assert!(err.to_string().contains("rti_host"));
}
