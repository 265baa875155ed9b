fn main() {
    prost_build::compile_protos(&["proto/replay.proto"], &["proto/"]).expect("compile replay.proto");
}
