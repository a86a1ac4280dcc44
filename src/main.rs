use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use asynchronix::model::Model;
use asynchronix::simulation::{Mailbox, SimInit};
use asynchronix::time::{MonotonicTime, Scheduler};
use env_logger::Env;
use log::info;

use axi_memsim::axi::*;

const SPEC: MemorySpec = MemorySpec {
    data_width: 32,
    error_noninit: true,
    rand_noninit: false,
    response_delay: (2, 10),
};
const SEED: u64 = 0x5EED;
const BASE: u64 = 0x100;
const BEATS: u8 = 4;

// stands in for the B and R channel initiators of a testbench
struct ResponseSink {
    b_count: Arc<AtomicUsize>,
    r_count: Arc<AtomicUsize>,
}

impl ResponseSink {
    pub fn on_write_rsp(&mut self, rsp: WriteResponse, scheduler: &Scheduler<Self>) {
        info!("{:?}: B id={:?}", scheduler.time(), rsp.id);
        self.b_count.fetch_add(1, Ordering::Relaxed);
    }
    pub fn on_read_rsp(&mut self, rsp: ReadResponse, scheduler: &Scheduler<Self>) {
        info!("{:?}: R id={:?} data=0x{:08X} last={}", scheduler.time(), rsp.id, rsp.data, rsp.last);
        self.r_count.fetch_add(1, Ordering::Relaxed);
    }
}

impl Model for ResponseSink {}

fn main() {
    // logging
    let env = Env::default()
        .filter_or("AXI_MEMSIM_LOG", "info")
        .write_style_or("AXI_MEMSIM_LOG_STYLE", "always");
    env_logger::init_from_env(env);

    let b_count = Arc::new(AtomicUsize::new(0));
    let r_count = Arc::new(AtomicUsize::new(0));

    // create models
    let mut mem = match MemoryModel::with_seed(SPEC, SEED) {
        Ok(mem) => mem,
        Err(e) => {
            eprintln!("bad memory configuration: {}", e);
            std::process::exit(1);
        }
    };
    let sink = ResponseSink { b_count: b_count.clone(), r_count: r_count.clone() };

    // create mailboxes and connect models
    let mem_mbox = Mailbox::<MemoryModel>::new();
    let sink_mbox = Mailbox::<ResponseSink>::new();
    mem.o_wrsp.connect(ResponseSink::on_write_rsp, &sink_mbox);
    mem.o_rrsp.connect(ResponseSink::on_read_rsp, &sink_mbox);
    let mem_addr = mem_mbox.address();

    // initialize simulation
    let mut sim = SimInit::new()
        .add_model(mem, mem_mbox)
        .add_model(sink, sink_mbox)
        .init(MonotonicTime::EPOCH);

    // write a burst, with the data phase trailing the address phase
    sim.send_event(
        MemoryModel::on_capture,
        Captured::WriteAddress(WriteAddress { id: 1, address: BASE, length: BEATS - 1, burst: Burst::Incr }),
        &mem_addr,
    );
    for i in 0..BEATS {
        sim.step_by(Duration::from_nanos(1));
        sim.send_event(
            MemoryModel::on_capture,
            Captured::WriteData(WriteData {
                data: 0xC0DE_0000 | i as u128,
                strobe: 0xF,
                last: i == BEATS - 1,
            }),
            &mem_addr,
        );
    }

    // read it back
    sim.step_by(Duration::from_nanos(20));
    sim.send_event(
        MemoryModel::on_capture,
        Captured::ReadAddress(ReadAddress { id: 2, address: BASE, length: BEATS - 1, burst: Burst::Incr }),
        &mem_addr,
    );

    // drain outstanding responses
    sim.step_by(Duration::from_nanos(SPEC.response_delay.1 + 1));

    println!(
        "finished simulation at {:?}: {} write responses, {} read beats",
        sim.time(),
        b_count.load(Ordering::Relaxed),
        r_count.load(Ordering::Relaxed),
    );
}
