/*
    AXI4 / AXI4-Lite memory responder for simulation testbenches.
 */

pub mod axi;
pub mod delayed_q;
