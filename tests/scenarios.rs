use mmu_sim::{Mmu, MmuError};

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 253) as u8 + 1).collect()
}

// =========================================================================
// Walkthrough on a 1024-byte memory with 256-byte frames
// =========================================================================

#[test]
fn test_alloc_write_read_free_walkthrough() {
    let mut mmu = Mmu::new(1024, 256).unwrap();
    assert_eq!(mmu.num_frames(), 4);

    // 300 bytes need two frames
    mmu.alloc(1, 300).unwrap();
    assert_eq!(mmu.page_count(1), Ok(2));
    assert_eq!(mmu.free_frame_count(), 2);

    // 600 bytes overflow the 512 mapped bytes by 88, which maps one more frame
    let data = pattern(600);
    mmu.write(1, 0, &data).unwrap();
    assert_eq!(mmu.page_count(1), Ok(3));
    assert_eq!(mmu.free_frame_count(), 1);

    assert_eq!(mmu.read(1, 0, 600).unwrap(), data);

    let last_frame = mmu.page_table(1).unwrap().lookup(2).unwrap();
    assert!(mmu.frame(last_frame).unwrap().iter().any(|&b| b != 0));

    mmu.free(1, 1).unwrap();
    assert_eq!(mmu.page_count(1), Ok(2));
    assert_eq!(mmu.free_frame_count(), 2);
    assert!(mmu.frame(last_frame).unwrap().iter().all(|&b| b == 0));

    // The first two pages still hold their data
    assert_eq!(mmu.read(1, 0, 512).unwrap(), &data[..512]);
    assert_eq!(mmu.read(1, 0, 513), Err(MmuError::AddressOutOfBounds));
    mmu.check_invariants().unwrap();
}

#[test]
fn test_exhausting_memory_creates_no_table_for_failed_pid() {
    let mut mmu = Mmu::new(1024, 256).unwrap();

    mmu.alloc(1, 1000).unwrap();
    assert_eq!(mmu.page_count(1), Ok(4));
    assert_eq!(mmu.free_frame_count(), 0);

    assert_eq!(mmu.alloc(2, 1), Err(MmuError::OutOfMemory));
    assert_eq!(mmu.page_table(2), Err(MmuError::InvalidProcess));
    assert_eq!(mmu.processes(), vec![1]);
    mmu.check_invariants().unwrap();
}

// =========================================================================
// Cross-process behaviour
// =========================================================================

#[test]
fn test_freed_frames_read_back_zero_for_next_owner() {
    let mut mmu = Mmu::new(1024, 256).unwrap();
    mmu.alloc(1, 1024).unwrap();
    mmu.write(1, 0, &[0xffu8; 1024]).unwrap();

    mmu.free(1, 2).unwrap();
    mmu.alloc(2, 512).unwrap();

    // Pid 2 gets the frames pid 1 just gave up
    assert_eq!(mmu.page_table(2).unwrap().frames(), &[2, 3]);
    assert_eq!(mmu.read(2, 0, 512).unwrap(), vec![0u8; 512]);
    assert_eq!(mmu.read(1, 0, 512).unwrap(), vec![0xffu8; 512]);
    mmu.check_invariants().unwrap();
}

#[test]
fn test_processes_are_isolated() {
    let mut mmu = Mmu::new(2048, 128).unwrap();
    mmu.alloc(1, 200).unwrap();
    mmu.alloc(2, 200).unwrap();

    mmu.write(1, 0, &[1u8; 256]).unwrap();
    mmu.write(2, 0, &[2u8; 256]).unwrap();

    assert_eq!(mmu.read(1, 0, 256).unwrap(), vec![1u8; 256]);
    assert_eq!(mmu.read(2, 0, 256).unwrap(), vec![2u8; 256]);
    assert_eq!(mmu.read(3, 0, 1), Err(MmuError::InvalidProcess));
}

#[test]
fn test_write_at_offset_spanning_pages() {
    let mut mmu = Mmu::new(1024, 64).unwrap();
    mmu.alloc(7, 64).unwrap();

    // Starts near the end of page 0 and runs into pages 1 and 2
    let data = pattern(100);
    mmu.write(7, 60, &data).unwrap();

    assert_eq!(mmu.page_count(7), Ok(3));
    assert_eq!(mmu.read(7, 60, 100).unwrap(), data);
    assert_eq!(mmu.read(7, 0, 60).unwrap(), vec![0u8; 60]);
}

#[test]
fn test_write_can_grow_a_fully_freed_process() {
    let mut mmu = Mmu::new(1024, 256).unwrap();
    mmu.alloc(1, 256).unwrap();
    mmu.free(1, 1).unwrap();

    // With nothing mapped even address 0 is out of bounds
    assert_eq!(mmu.write(1, 0, b"x"), Err(MmuError::AddressOutOfBounds));

    mmu.alloc(1, 1).unwrap();
    mmu.write(1, 0, b"x").unwrap();
    assert_eq!(mmu.read(1, 0, 1).unwrap(), b"x");
}
