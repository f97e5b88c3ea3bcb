fn main() {
    #[cfg(not(target_os = "android"))]
    {
        input_bridge_demo::desktop_main()
    }
    #[cfg(target_os = "android")]
    {
        // android platform wont actually compile this file
        // but we need to make rust-analyzer happy
    }
}
