//! Every configuration default, in one place.
//!
//! | key                     | default        |
//! |-------------------------|----------------|
//! | `appDirectory`          | `app`          |
//! | `dataDirectory`         | `data`         |
//! | `browserBuildDirectory` | `public/build` |
//! | `serverBuildDirectory`  | `build`        |
//! | `publicPath`            | `/build/`      |
//! | `devServerPort`         | `8002`         |
//! | `routes`                | none           |
//! | `mdx`                   | none           |

use std::path::PathBuf;

pub fn default_app_directory() -> PathBuf {
    PathBuf::from("app")
}

pub fn default_data_directory() -> PathBuf {
    PathBuf::from("data")
}

pub fn default_browser_build_directory() -> PathBuf {
    PathBuf::from("public/build")
}

pub fn default_server_build_directory() -> PathBuf {
    PathBuf::from("build")
}

pub fn default_public_path() -> String {
    "/build/".to_string()
}

pub fn default_dev_server_port() -> u16 {
    8002
}
