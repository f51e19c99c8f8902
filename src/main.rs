fn main() {
    if let Err(e) = bv2nii::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
