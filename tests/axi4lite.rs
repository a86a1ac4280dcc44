use axi_memsim::axi::*;
use axi_memsim::delayed_q::DeliveryQueue;

type LiteMem = Axi4LiteMemory<Vec<WriteResponse>, Vec<ReadResponse>>;

fn mem(error_noninit: bool, rand_noninit: bool) -> LiteMem {
    let spec = MemorySpec { data_width: 32, error_noninit, rand_noninit, response_delay: (0, 0) };
    Axi4LiteMemory::with_seed(spec, 3, Vec::new(), Vec::new()).unwrap()
}

fn aw(address: u64) -> LiteCaptured {
    LiteWriteAddress { address }.into()
}

fn w(data: u128, strobe: u16) -> LiteCaptured {
    LiteWriteData { data, strobe }.into()
}

fn ar(address: u64) -> LiteCaptured {
    LiteReadAddress { address }.into()
}

#[test]
fn write_then_read() {
    let mut m = mem(true, false);
    m.handle(10, aw(0x100)).unwrap();
    assert!(m.brsp.is_empty());
    m.handle(10, w(0xDEAD_BEEF, 0xF)).unwrap();
    assert_eq!(m.brsp, vec![WriteResponse { id: None, deliver_at: 10 }]);

    m.handle(12, ar(0x100)).unwrap();
    assert_eq!(
        m.rrsp,
        vec![ReadResponse { id: None, data: 0xDEAD_BEEF, last: true, deliver_at: 12 }]
    );
}

#[test]
fn every_beat_is_a_whole_transaction() {
    // no last flag on lite, data arriving first still pairs one-to-one
    let mut m = mem(true, false);
    m.handle(0, w(0x1, 0xF)).unwrap();
    m.handle(0, w(0x2, 0xF)).unwrap();
    assert_eq!(m.pending_beats(), 2);
    m.handle(0, aw(0x0)).unwrap();
    assert_eq!(m.brsp.len(), 1);
    assert_eq!(m.pending_beats(), 1);
    m.handle(0, aw(0x4)).unwrap();
    assert_eq!(m.brsp.len(), 2);
    assert_eq!(m.pending_writes(), 0);
    assert_eq!(m.memory().peek(0x0), Some(0x1));
    assert_eq!(m.memory().peek(0x4), Some(0x2));
}

#[test]
fn partial_strobe_merge() {
    let mut m = mem(true, false);
    m.handle(0, aw(0x40)).unwrap();
    m.handle(0, w(0xAABB_CCDD, 0xF)).unwrap();
    m.handle(0, aw(0x40)).unwrap();
    m.handle(0, w(0x0000_1234, 0b0011)).unwrap();
    m.handle(0, ar(0x40)).unwrap();
    assert_eq!(m.rrsp[0].data, 0xAABB_1234);
}

#[test]
fn uninitialised_policies() {
    let mut strict = mem(true, true);
    assert_eq!(strict.handle(0, ar(0x8)), Err(MemError::UninitializedAccess { address: 0x8 }));
    assert_eq!(strict.handle(0, ar(0x8)), Err(MemError::UninitializedAccess { address: 0x8 }));

    let mut random = mem(false, true);
    random.handle(0, ar(0x8)).unwrap();
    random.handle(0, ar(0x8)).unwrap();
    assert_eq!(random.rrsp[0].data, random.rrsp[1].data);

    let mut zero = mem(false, false);
    zero.handle(0, ar(0x8)).unwrap();
    assert_eq!(zero.rrsp[0].data, 0);
}

#[test]
fn responses_wait_in_delivery_queue() {
    let spec = MemorySpec { data_width: 64, error_noninit: false, rand_noninit: false, response_delay: (4, 4) };
    let mut m = Axi4LiteMemory::with_seed(
        spec,
        9,
        DeliveryQueue::<WriteResponse>::new(),
        DeliveryQueue::<ReadResponse>::new(),
    )
    .unwrap();
    m.handle(20, aw(0x0)).unwrap();
    m.handle(21, w(u64::MAX as u128, 0xFF)).unwrap();
    m.handle(22, ar(0x0)).unwrap();
    assert!(m.brsp.release(24).is_empty());
    assert_eq!(m.brsp.release(25), vec![WriteResponse { id: None, deliver_at: 25 }]);
    assert_eq!(m.rrsp.next_deadline(), Some(26));
    assert_eq!(m.rrsp.release(26)[0].data, u64::MAX as u128);
}
