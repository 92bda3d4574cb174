// src/fetch/urls.rs

use url::Url;

use crate::error::EvResult;

/// `<base>/data-<region>.js`. The base is treated as a directory whether or
/// not it ends with a slash.
pub fn data_url(base: &Url, region: &str) -> EvResult<Url> {
    let mut dir = base.clone();
    if !dir.path().ends_with('/') {
        let path = format!("{}/", dir.path());
        dir.set_path(&path);
    }
    Ok(dir.join(&format!("data-{}.js", region))?)
}
