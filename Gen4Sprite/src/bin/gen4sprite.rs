fn main() -> anyhow::Result<()> {
    gen4sprite::cli::run_cli()
}
