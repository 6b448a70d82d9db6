mod runtime;

fn main() {
    runtime::run();
}
