fn main() {
    env_logger::init();
    let cli = relation_mesh::cli::parse();
    let code = relation_mesh::app::run_cli(cli);
    if code != 0 {
        std::process::exit(code);
    }
}
