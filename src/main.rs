fn main() {
    if let Err(err) = okr_tree_layout::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
