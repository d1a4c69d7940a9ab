mod sysfs;

pub use self::sysfs::SysfsGpio;
