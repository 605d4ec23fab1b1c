// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

fn buddhabrot() -> Command {
    Command::cargo_bin("buddhabrot-amp").unwrap()
}

#[test]
fn help_exits_cleanly() {
    buddhabrot()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--points"));
}

#[test]
fn non_square_point_count_is_refused() {
    buddhabrot()
        .args(&["--points", "1000"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("perfect square"));
}

#[test]
fn malformed_dimension_is_refused() {
    buddhabrot()
        .args(&["--dimension", "huge"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("USAGE"));
}

#[test]
fn malformed_band_is_refused() {
    buddhabrot()
        .args(&["--red", "10-20"])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn small_render_writes_a_png() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("small.png");
    buddhabrot()
        .args(&[
            "-d", "32", "-p", "256", "-n", "2", "-t", "1", "-w", "0", "-s", "9",
            "--red", "0,10", "--green", "10,20", "--blue", "20,40", "-f",
        ])
        .arg(&output)
        .assert()
        .success();

    let img = image::open(&output).unwrap().to_rgba();
    assert_eq!(img.dimensions(), (32, 32));
}
