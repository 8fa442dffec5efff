// Mon Oct 19 2026 - Alex

use api_ref_search::ui::{cli, print_error};

fn main() {
    if let Err(e) = cli::run() {
        print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
