fn main() -> anyhow::Result<()> {
    map_model::run()
}
