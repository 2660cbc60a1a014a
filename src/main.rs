fn main() -> anyhow::Result<()> {
    klondike_search::run()
}
