//! Resolution and selection walked together, the way the install flow
//! chains them.

use rigup_platform::{Arch, Os};
use rigup_release::{Release, ReleaseAsset, select};
use rigup_version::{VersionSpec, normalize_tag, resolve};
use semver::Version;

fn asset(name: &str) -> ReleaseAsset {
    ReleaseAsset {
        name: name.to_string(),
        browser_download_url: format!("https://example.com/{name}"),
    }
}

fn catalog() -> Vec<Release> {
    ["v0.4.0", "v0.5.0", "v0.5.2"]
        .into_iter()
        .map(|tag| Release {
            tag_name: tag.to_string(),
            assets:   vec![
                asset("ollama-darwin"),
                asset("ollama-linux-amd64"),
                asset("ollama-linux-arm64"),
                asset("ollama-windows-amd64.zip"),
                asset("sha256sum.txt"),
            ],
        })
        .collect()
}

#[test]
fn latest_on_linux_x64_picks_highest_release_and_amd64_asset() {
    let releases = catalog();
    let tags: Vec<&str> = releases.iter().map(|r| r.tag_name.as_str()).collect();

    let version = resolve(&VersionSpec::Latest, tags).unwrap();
    assert_eq!(version, Version::new(0, 5, 2));

    let release = releases
        .iter()
        .find(|r| normalize_tag(&r.tag_name).as_ref() == Some(&version))
        .unwrap();
    let selection = select(release, Os::Linux, Arch::X64).unwrap();

    assert_eq!(selection.asset.name, "ollama-linux-amd64");
    assert_eq!(selection.checksum.name, "sha256sum.txt");
}

#[test]
fn range_constrained_request_stays_inside_the_range() {
    let releases = catalog();
    let tags: Vec<&str> = releases.iter().map(|r| r.tag_name.as_str()).collect();

    let spec: VersionSpec = "~0.4".parse().unwrap();
    let version = resolve(&spec, tags).unwrap();
    assert_eq!(version, Version::new(0, 4, 0));
}
