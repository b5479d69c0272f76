//! Tests for the reference table service
//!
//! Shared helpers for writing OCD-ID tables to scratch files.


use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const SLDU_CSV: &str = "id,census_geoid_14,name\n\
ocd-division/country:us/state:ca/sldu:1,sldu-06001,State Senate District 1\n\
ocd-division/country:us/state:ca/sldu:2,sldu-06002,State Senate District 2\n";

pub const SLDL_CSV: &str = "id,census_geoid_14,name\n\
ocd-division/country:us/state:ca/sldl:1,sldl-06001,Assembly District 1\n\
ocd-division/country:us/state:ca/sldl:99,sldu-06001,Shadowed by the upper table\n";

/// Write `content` to `name` inside `temp_dir`
pub fn write_table(temp_dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = temp_dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}
