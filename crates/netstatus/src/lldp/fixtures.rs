//! LLDP frame and log builders for tests.

/// Encode one TLV.
pub fn tlv_bytes(tlv_type: u8, data: &[u8]) -> Vec<u8> {
    let header = ((tlv_type as u16) << 9) | data.len() as u16;
    let mut buf = header.to_be_bytes().to_vec();
    buf.extend_from_slice(data);
    buf
}

/// Builds raw LLDP Ethernet frames.
pub struct FrameBuilder {
    buf: Vec<u8>,
}

impl FrameBuilder {
    /// Start a frame addressed to the nearest-bridge group address.
    pub fn new() -> Self {
        let mut buf = vec![0x01, 0x80, 0xc2, 0x00, 0x00, 0x0e]; // destination
        buf.extend_from_slice(&[0x02, 0x11, 0x22, 0x33, 0x44, 0x55]); // source
        buf.extend_from_slice(&[0x88, 0xcc]); // ethertype
        Self { buf }
    }

    pub fn tlv(mut self, tlv_type: u8, data: &[u8]) -> Self {
        self.buf.extend_from_slice(&tlv_bytes(tlv_type, data));
        self
    }

    /// Chassis ID with the MAC address subtype.
    pub fn chassis_mac(self, mac: [u8; 6]) -> Self {
        let mut data = vec![4];
        data.extend_from_slice(&mac);
        self.tlv(1, &data)
    }

    /// Port ID with the interface name subtype.
    pub fn port_name(self, name: &str) -> Self {
        let mut data = vec![5];
        data.extend_from_slice(name.as_bytes());
        self.tlv(2, &data)
    }

    pub fn ttl(self, ttl: u16) -> Self {
        self.tlv(3, &ttl.to_be_bytes())
    }

    pub fn port_description(self, description: &str) -> Self {
        self.tlv(4, description.as_bytes())
    }

    pub fn system_name(self, name: &str) -> Self {
        self.tlv(5, name.as_bytes())
    }

    pub fn capabilities(self, supported: u16, enabled: u16) -> Self {
        let mut data = supported.to_be_bytes().to_vec();
        data.extend_from_slice(&enabled.to_be_bytes());
        self.tlv(7, &data)
    }

    /// Finish the frame with an END TLV.
    pub fn build(self) -> Vec<u8> {
        self.tlv(0, &[]).buf
    }

    pub fn build_without_end(self) -> Vec<u8> {
        self.buf
    }
}

/// A typical switch neighbor frame.
pub fn switch_frame(system_name: &str, port: &str) -> Vec<u8> {
    FrameBuilder::new()
        .chassis_mac([0x00, 0x1b, 0x21, 0x01, 0x02, 0x03])
        .port_name(port)
        .ttl(120)
        .port_description("uplink")
        .system_name(system_name)
        .capabilities(0x0014, 0x0014)
        .build()
}

/// Encode frames as log records.
pub fn log_bytes(frames: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = Vec::new();
    for frame in frames {
        buf.extend_from_slice(&(frame.len() as u64).to_le_bytes());
        buf.extend_from_slice(frame);
    }
    buf
}
